//! Chambre — a room belonging to a [`Bloc`](crate::bloc::Bloc).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::ChambreId;

/// Room occupancy kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeChambre {
    Simple,
    Double,
    Triple,
}

impl TypeChambre {
    /// Stable textual form used for storage and serialization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "SIMPLE",
            Self::Double => "DOUBLE",
            Self::Triple => "TRIPLE",
        }
    }
}

impl fmt::Display for TypeChambre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored room type is not one of the known variants.
#[derive(Debug, thiserror::Error)]
#[error("unknown room type {0:?}")]
pub struct UnknownTypeChambre(pub String);

impl FromStr for TypeChambre {
    type Err = UnknownTypeChambre;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SIMPLE" => Ok(Self::Simple),
            "DOUBLE" => Ok(Self::Double),
            "TRIPLE" => Ok(Self::Triple),
            other => Err(UnknownTypeChambre(other.to_string())),
        }
    }
}

/// A room. The id is `None` until storage assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chambre {
    pub id: Option<ChambreId>,
    pub numero_chambre: i64,
    pub type_c: TypeChambre,
}

impl Chambre {
    /// Create a room that has not been persisted yet.
    #[must_use]
    pub fn new(numero_chambre: i64, type_c: TypeChambre) -> Self {
        Self {
            id: None,
            numero_chambre,
            type_c,
        }
    }
}
