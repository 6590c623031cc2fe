//! Errors raised while talking to `SQLite`.

use tpfoyer_domain::error::TpFoyerError;
use tpfoyer_domain::id::{BlocId, ChambreId};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed, including rows that could not be decoded.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A save referenced a chambre that belongs to another bloc.
    #[error("chambre {chambre} is not owned by bloc {bloc}")]
    ForeignChambre { chambre: ChambreId, bloc: BlocId },
}

impl From<StorageError> for TpFoyerError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
