//! Bloc — a dormitory building with a name, a capacity and its rooms.

use serde::{Deserialize, Serialize};

use crate::chambre::Chambre;
use crate::error::{TpFoyerError, ValidationError};
use crate::id::{BlocId, FoyerId};

/// A dormitory building.
///
/// `id` stays `None` until storage assigns one on the first save; after that
/// it identifies the bloc for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bloc {
    pub id: Option<BlocId>,
    pub nom_bloc: String,
    pub capacite_bloc: u32,
    /// Parent foyer, if the bloc has been attached to one.
    pub foyer: Option<FoyerId>,
    #[serde(default)]
    pub chambres: Vec<Chambre>,
}

impl Bloc {
    /// Create a builder for constructing a [`Bloc`].
    #[must_use]
    pub fn builder() -> BlocBuilder {
        BlocBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TpFoyerError::Validation`] when `nom_bloc` is empty.
    pub fn validate(&self) -> Result<(), TpFoyerError> {
        if self.nom_bloc.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Whether the bloc offers strictly more places than `threshold`.
    ///
    /// Any negative threshold is exceeded by every bloc.
    #[must_use]
    pub fn exceeds_capacity(&self, threshold: i64) -> bool {
        i64::from(self.capacite_bloc) > threshold
    }
}

/// Step-by-step builder for [`Bloc`].
#[derive(Debug, Default)]
pub struct BlocBuilder {
    id: Option<BlocId>,
    nom_bloc: Option<String>,
    capacite_bloc: u32,
    foyer: Option<FoyerId>,
    chambres: Vec<Chambre>,
}

impl BlocBuilder {
    #[must_use]
    pub fn id(mut self, id: BlocId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn nom_bloc(mut self, nom_bloc: impl Into<String>) -> Self {
        self.nom_bloc = Some(nom_bloc.into());
        self
    }

    #[must_use]
    pub fn capacite_bloc(mut self, capacite_bloc: u32) -> Self {
        self.capacite_bloc = capacite_bloc;
        self
    }

    #[must_use]
    pub fn foyer(mut self, foyer: FoyerId) -> Self {
        self.foyer = Some(foyer);
        self
    }

    #[must_use]
    pub fn chambre(mut self, chambre: Chambre) -> Self {
        self.chambres.push(chambre);
        self
    }

    /// Consume the builder, validate, and return a [`Bloc`].
    ///
    /// # Errors
    ///
    /// Returns [`TpFoyerError::Validation`] if `nom_bloc` is missing or empty.
    pub fn build(self) -> Result<Bloc, TpFoyerError> {
        let bloc = Bloc {
            id: self.id,
            nom_bloc: self.nom_bloc.unwrap_or_default(),
            capacite_bloc: self.capacite_bloc,
            foyer: self.foyer,
            chambres: self.chambres,
        };
        bloc.validate()?;
        Ok(bloc)
    }
}
