//! Bloc service — use-cases for managing blocs.

use tpfoyer_domain::bloc::Bloc;
use tpfoyer_domain::error::{NotFoundError, TpFoyerError};
use tpfoyer_domain::id::BlocId;

use crate::ports::BlocRepository;

/// Application service for bloc CRUD operations.
///
/// Every operation is a single repository call; only
/// [`retrieve_blocs_selon_capacite`](Self::retrieve_blocs_selon_capacite)
/// does work of its own.
pub struct BlocService<R> {
    repo: R,
}

impl<R: BlocRepository> BlocService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// List all blocs in storage order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn retrieve_all_blocs(&self) -> Result<Vec<Bloc>, TpFoyerError> {
        self.repo.find_all().await
    }

    /// List the blocs whose capacity is strictly greater than `threshold`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn retrieve_blocs_selon_capacite(
        &self,
        threshold: i64,
    ) -> Result<Vec<Bloc>, TpFoyerError> {
        let blocs = self.repo.find_all().await?;
        let total = blocs.len();
        let kept: Vec<Bloc> = blocs
            .into_iter()
            .filter(|bloc| bloc.exceeds_capacity(threshold))
            .collect();
        tracing::debug!(total, kept = kept.len(), "filtered blocs by capacity");
        Ok(kept)
    }

    /// Look up a bloc by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`TpFoyerError::NotFound`] when no bloc with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn retrieve_bloc(&self, id: BlocId) -> Result<Bloc, TpFoyerError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Bloc",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Persist a new bloc.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, bloc), fields(nom_bloc = %bloc.nom_bloc))]
    pub async fn add_bloc(&self, bloc: Bloc) -> Result<Bloc, TpFoyerError> {
        self.repo.save(bloc).await
    }

    /// Persist changes to an existing bloc.
    ///
    /// Same upsert as [`add_bloc`](Self::add_bloc); only the caller's intent
    /// differs.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, bloc), fields(id = ?bloc.id, nom_bloc = %bloc.nom_bloc))]
    pub async fn modify_bloc(&self, bloc: Bloc) -> Result<Bloc, TpFoyerError> {
        self.repo.save(bloc).await
    }

    /// Delete a bloc by id. A missing id is not an error.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn remove_bloc(&self, id: BlocId) -> Result<(), TpFoyerError> {
        self.repo.delete_by_id(id).await
    }

    /// List the blocs not attached to any foyer.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn trouver_blocs_sans_foyer(&self) -> Result<Vec<Bloc>, TpFoyerError> {
        self.repo.find_all_by_foyer_is_null().await
    }

    /// List the blocs matching both `nom_bloc` and `capacite_bloc` exactly.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn trouver_blocs_par_nom_et_cap(
        &self,
        nom_bloc: &str,
        capacite_bloc: u32,
    ) -> Result<Vec<Bloc>, TpFoyerError> {
        self.repo
            .find_all_by_nom_bloc_and_capacite_bloc(nom_bloc, capacite_bloc)
            .await
    }
}
