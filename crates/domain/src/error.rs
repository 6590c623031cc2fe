//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`TpFoyerError`]
//! via `From`.

/// Top-level error shared by the application and its adapters.
#[derive(Debug, thiserror::Error)]
pub enum TpFoyerError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A lookup by id found nothing.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The storage collaborator failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
}

/// Raised when an entity with the given id does not exist.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of entity that was looked up (e.g. `"Bloc"`).
    pub entity: &'static str,
    /// Textual form of the missing identifier.
    pub id: String,
}
