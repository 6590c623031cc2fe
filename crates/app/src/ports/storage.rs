//! Storage port — repository traits for persistence.

use std::future::Future;

use tpfoyer_domain::bloc::Bloc;
use tpfoyer_domain::error::TpFoyerError;
use tpfoyer_domain::id::BlocId;

/// Repository for persisting and querying [`Bloc`]s.
pub trait BlocRepository {
    /// Get every stored bloc, in storage order.
    fn find_all(&self) -> impl Future<Output = Result<Vec<Bloc>, TpFoyerError>> + Send;

    /// Get a bloc by its identifier.
    fn find_by_id(
        &self,
        id: BlocId,
    ) -> impl Future<Output = Result<Option<Bloc>, TpFoyerError>> + Send;

    /// Insert the bloc when `id` is `None`, otherwise overwrite the stored one.
    ///
    /// Returns the persisted bloc with every storage-assigned id filled in.
    fn save(&self, bloc: Bloc) -> impl Future<Output = Result<Bloc, TpFoyerError>> + Send;

    /// Delete a bloc and its chambres. Deleting a missing id is a no-op.
    fn delete_by_id(&self, id: BlocId) -> impl Future<Output = Result<(), TpFoyerError>> + Send;

    /// Get every bloc that is not attached to a foyer.
    fn find_all_by_foyer_is_null(
        &self,
    ) -> impl Future<Output = Result<Vec<Bloc>, TpFoyerError>> + Send;

    /// Get every bloc whose name and capacity both match exactly.
    fn find_all_by_nom_bloc_and_capacite_bloc(
        &self,
        nom_bloc: &str,
        capacite_bloc: u32,
    ) -> impl Future<Output = Result<Vec<Bloc>, TpFoyerError>> + Send;
}
