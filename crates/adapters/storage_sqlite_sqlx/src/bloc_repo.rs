//! `SQLite` implementation of [`BlocRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

use tpfoyer_app::ports::BlocRepository;
use tpfoyer_domain::bloc::Bloc;
use tpfoyer_domain::chambre::{Chambre, TypeChambre};
use tpfoyer_domain::error::TpFoyerError;
use tpfoyer_domain::id::{BlocId, ChambreId, FoyerId};

use crate::error::StorageError;

/// Wrapper for converting `blocs` rows into domain [`Bloc`].
///
/// Chambres live in their own table and are attached afterwards.
struct Wrapper(Bloc);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let nom_bloc: String = row.try_get("nom_bloc")?;
        let capacite_bloc: u32 = row.try_get("capacite_bloc")?;
        let foyer_id: Option<i64> = row.try_get("foyer_id")?;

        Ok(Self(Bloc {
            id: Some(BlocId::new(id)),
            nom_bloc,
            capacite_bloc,
            foyer: foyer_id.map(FoyerId::new),
            chambres: Vec::new(),
        }))
    }
}

struct ChambreWrapper(Chambre);

impl<'r> FromRow<'r, SqliteRow> for ChambreWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let numero_chambre: i64 = row.try_get("numero_chambre")?;
        let type_chambre: String = row.try_get("type_chambre")?;

        let type_c = type_chambre
            .parse::<TypeChambre>()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Chambre {
            id: Some(ChambreId::new(id)),
            numero_chambre,
            type_c,
        }))
    }
}

const UPSERT: &str = "INSERT INTO blocs (id, nom_bloc, capacite_bloc, foyer_id) VALUES (?, ?, ?, ?) \
     ON CONFLICT (id) DO UPDATE SET nom_bloc = excluded.nom_bloc, \
     capacite_bloc = excluded.capacite_bloc, foyer_id = excluded.foyer_id";
const SELECT_BY_ID: &str = "SELECT * FROM blocs WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM blocs ORDER BY id";
const SELECT_WITHOUT_FOYER: &str = "SELECT * FROM blocs WHERE foyer_id IS NULL ORDER BY id";
const SELECT_BY_NOM_AND_CAPACITE: &str =
    "SELECT * FROM blocs WHERE nom_bloc = ? AND capacite_bloc = ? ORDER BY id";
const DELETE_BY_ID: &str = "DELETE FROM blocs WHERE id = ?";

const SELECT_CHAMBRES: &str = "SELECT * FROM chambres WHERE bloc_id = ? ORDER BY id";
const DELETE_CHAMBRES: &str = "DELETE FROM chambres WHERE bloc_id = ?";
const UPSERT_CHAMBRE: &str = "INSERT INTO chambres (id, numero_chambre, type_chambre, bloc_id) VALUES (?, ?, ?, ?) \
     ON CONFLICT (id) DO UPDATE SET numero_chambre = excluded.numero_chambre, \
     type_chambre = excluded.type_chambre \
     WHERE chambres.bloc_id = excluded.bloc_id";

/// `SQLite`-backed bloc repository.
pub struct SqliteBlocRepository {
    pool: SqlitePool,
}

impl SqliteBlocRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn fetch_chambres(pool: &SqlitePool, bloc_id: BlocId) -> Result<Vec<Chambre>, sqlx::Error> {
    let rows: Vec<ChambreWrapper> = sqlx::query_as(SELECT_CHAMBRES)
        .bind(bloc_id.get())
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|w| w.0).collect())
}

async fn with_chambres(pool: &SqlitePool, rows: Vec<Wrapper>) -> Result<Vec<Bloc>, sqlx::Error> {
    let mut blocs = Vec::with_capacity(rows.len());
    for Wrapper(mut bloc) in rows {
        if let Some(id) = bloc.id {
            bloc.chambres = fetch_chambres(pool, id).await?;
        }
        blocs.push(bloc);
    }
    Ok(blocs)
}

/// Write the bloc row then replace its chambres, all on one connection.
///
/// A chambre id owned by another bloc aborts the write; the caller's
/// transaction rolls back.
async fn write_bloc(conn: &mut SqliteConnection, bloc: Bloc) -> Result<Bloc, StorageError> {
    let result = sqlx::query(UPSERT)
        .bind(bloc.id.map(BlocId::get))
        .bind(&bloc.nom_bloc)
        .bind(bloc.capacite_bloc)
        .bind(bloc.foyer.map(FoyerId::get))
        .execute(&mut *conn)
        .await?;
    let id = bloc
        .id
        .unwrap_or_else(|| BlocId::new(result.last_insert_rowid()));

    sqlx::query(DELETE_CHAMBRES)
        .bind(id.get())
        .execute(&mut *conn)
        .await?;

    let mut chambres = Vec::with_capacity(bloc.chambres.len());
    for chambre in bloc.chambres {
        let result = sqlx::query(UPSERT_CHAMBRE)
            .bind(chambre.id.map(ChambreId::get))
            .bind(chambre.numero_chambre)
            .bind(chambre.type_c.as_str())
            .bind(id.get())
            .execute(&mut *conn)
            .await?;
        if result.rows_affected() == 0
            && let Some(owned) = chambre.id
        {
            return Err(StorageError::ForeignChambre {
                chambre: owned,
                bloc: id,
            });
        }
        let chambre_id = chambre
            .id
            .unwrap_or_else(|| ChambreId::new(result.last_insert_rowid()));
        chambres.push(Chambre {
            id: Some(chambre_id),
            ..chambre
        });
    }

    Ok(Bloc {
        id: Some(id),
        chambres,
        ..bloc
    })
}

impl BlocRepository for SqliteBlocRepository {
    fn find_all(&self) -> impl Future<Output = Result<Vec<Bloc>, TpFoyerError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(with_chambres(&pool, rows)
                .await
                .map_err(StorageError::from)?)
        }
    }

    fn find_by_id(
        &self,
        id: BlocId,
    ) -> impl Future<Output = Result<Option<Bloc>, TpFoyerError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            let Some(Wrapper(mut bloc)) = row else {
                return Ok(None);
            };
            bloc.chambres = fetch_chambres(&pool, id)
                .await
                .map_err(StorageError::from)?;
            Ok(Some(bloc))
        }
    }

    fn save(&self, bloc: Bloc) -> impl Future<Output = Result<Bloc, TpFoyerError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            let saved = write_bloc(&mut *tx, bloc).await?;
            tx.commit().await.map_err(StorageError::from)?;

            Ok(saved)
        }
    }

    fn delete_by_id(&self, id: BlocId) -> impl Future<Output = Result<(), TpFoyerError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            sqlx::query(DELETE_CHAMBRES)
                .bind(id.get())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            sqlx::query(DELETE_BY_ID)
                .bind(id.get())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            tx.commit().await.map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn find_all_by_foyer_is_null(
        &self,
    ) -> impl Future<Output = Result<Vec<Bloc>, TpFoyerError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_WITHOUT_FOYER)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(with_chambres(&pool, rows)
                .await
                .map_err(StorageError::from)?)
        }
    }

    fn find_all_by_nom_bloc_and_capacite_bloc(
        &self,
        nom_bloc: &str,
        capacite_bloc: u32,
    ) -> impl Future<Output = Result<Vec<Bloc>, TpFoyerError>> + Send {
        let pool = self.pool.clone();
        let nom_bloc = nom_bloc.to_owned();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_NOM_AND_CAPACITE)
                .bind(nom_bloc)
                .bind(capacite_bloc)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(with_chambres(&pool, rows)
                .await
                .map_err(StorageError::from)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Database;

    async fn setup() -> SqliteBlocRepository {
        let db = Database::open("sqlite::memory:").await.unwrap();
        SqliteBlocRepository::new(db.pool().clone())
    }

    async fn insert_foyer(repo: &SqliteBlocRepository, id: i64) -> FoyerId {
        sqlx::query("INSERT INTO foyers (id, nom_foyer, capacite_foyer) VALUES (?, ?, ?)")
            .bind(id)
            .bind("Foyer El Ghazela")
            .bind(200)
            .execute(&repo.pool)
            .await
            .unwrap();
        FoyerId::new(id)
    }

    fn new_bloc(nom_bloc: &str, capacite_bloc: u32) -> Bloc {
        Bloc::builder()
            .nom_bloc(nom_bloc)
            .capacite_bloc(capacite_bloc)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_assign_id_when_saving_new_bloc() {
        let repo = setup().await;

        let saved = repo.save(new_bloc("Bloc1", 10)).await.unwrap();

        let id = saved.id.expect("storage should assign an id");
        let fetched = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched, saved);
    }

    #[tokio::test]
    async fn should_return_none_when_bloc_not_found() {
        let repo = setup().await;
        let result = repo.find_by_id(BlocId::new(404)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_list_all_blocs_in_id_order() {
        let repo = setup().await;
        repo.save(new_bloc("Bloc1", 10)).await.unwrap();
        repo.save(new_bloc("Bloc2", 20)).await.unwrap();

        let all = repo.find_all().await.unwrap();

        let names: Vec<&str> = all.iter().map(|b| b.nom_bloc.as_str()).collect();
        assert_eq!(names, vec!["Bloc1", "Bloc2"]);
    }

    #[tokio::test]
    async fn should_update_in_place_when_saving_existing_id() {
        let repo = setup().await;
        let mut bloc = repo.save(new_bloc("Bloc1", 10)).await.unwrap();
        let id = bloc.id;

        bloc.nom_bloc = "Bloc1 bis".to_string();
        bloc.capacite_bloc = 12;
        let updated = repo.save(bloc).await.unwrap();

        assert_eq!(updated.id, id);
        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].nom_bloc, "Bloc1 bis");
        assert_eq!(all[0].capacite_bloc, 12);
    }

    #[tokio::test]
    async fn should_store_chambres_through_roundtrip() {
        let repo = setup().await;
        let bloc = Bloc::builder()
            .nom_bloc("Bloc A")
            .capacite_bloc(3)
            .chambre(Chambre::new(101, TypeChambre::Simple))
            .chambre(Chambre::new(102, TypeChambre::Double))
            .build()
            .unwrap();

        let saved = repo.save(bloc).await.unwrap();
        assert!(saved.chambres.iter().all(|c| c.id.is_some()));

        let fetched = repo.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(fetched.chambres, saved.chambres);
        assert_eq!(fetched.chambres[1].type_c, TypeChambre::Double);
    }

    #[tokio::test]
    async fn should_replace_chambres_when_saving_again() {
        let repo = setup().await;
        let bloc = Bloc::builder()
            .nom_bloc("Bloc A")
            .chambre(Chambre::new(101, TypeChambre::Simple))
            .chambre(Chambre::new(102, TypeChambre::Simple))
            .build()
            .unwrap();
        let mut saved = repo.save(bloc).await.unwrap();

        saved.chambres.truncate(1);
        saved.chambres[0].type_c = TypeChambre::Triple;
        let resaved = repo.save(saved.clone()).await.unwrap();

        let fetched = repo.find_by_id(resaved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(fetched.chambres.len(), 1);
        assert_eq!(fetched.chambres[0].id, saved.chambres[0].id);
        assert_eq!(fetched.chambres[0].type_c, TypeChambre::Triple);
    }

    #[tokio::test]
    async fn should_refuse_chambre_owned_by_another_bloc() {
        let repo = setup().await;
        let owner = Bloc::builder()
            .nom_bloc("Bloc A")
            .chambre(Chambre::new(101, TypeChambre::Simple))
            .build()
            .unwrap();
        let owner = repo.save(owner).await.unwrap();
        let taken = owner.chambres[0].clone();

        let intruder = Bloc::builder()
            .nom_bloc("Bloc B")
            .chambre(taken.clone())
            .build()
            .unwrap();
        let result = repo.save(intruder).await;

        assert!(matches!(result, Err(TpFoyerError::Storage(_))));
        let fetched = repo.find_by_id(owner.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(fetched.chambres, vec![taken]);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_delete_bloc_and_its_chambres() {
        let repo = setup().await;
        let bloc = Bloc::builder()
            .nom_bloc("Bloc A")
            .chambre(Chambre::new(101, TypeChambre::Simple))
            .build()
            .unwrap();
        let id = repo.save(bloc).await.unwrap().id.unwrap();

        repo.delete_by_id(id).await.unwrap();

        assert!(repo.find_by_id(id).await.unwrap().is_none());
        let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chambres")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn should_ignore_delete_of_missing_bloc() {
        let repo = setup().await;
        repo.save(new_bloc("Bloc1", 10)).await.unwrap();

        repo.delete_by_id(BlocId::new(999)).await.unwrap();

        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_find_only_blocs_without_foyer() {
        let repo = setup().await;
        let foyer = insert_foyer(&repo, 1).await;
        let mut attached = new_bloc("Bloc attached", 10);
        attached.foyer = Some(foyer);
        repo.save(attached).await.unwrap();
        repo.save(new_bloc("Bloc orphan", 10)).await.unwrap();

        let result = repo.find_all_by_foyer_is_null().await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].nom_bloc, "Bloc orphan");
        assert!(result[0].foyer.is_none());
    }

    #[tokio::test]
    async fn should_keep_foyer_reference_through_roundtrip() {
        let repo = setup().await;
        let foyer = insert_foyer(&repo, 7).await;
        let mut bloc = new_bloc("Bloc B", 40);
        bloc.foyer = Some(foyer);

        let saved = repo.save(bloc).await.unwrap();

        let fetched = repo.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(fetched.foyer, Some(foyer));
    }

    #[tokio::test]
    async fn should_reject_unknown_foyer_reference() {
        let repo = setup().await;
        let mut bloc = new_bloc("Bloc B", 40);
        bloc.foyer = Some(FoyerId::new(12345));

        let result = repo.save(bloc).await;

        assert!(matches!(result, Err(TpFoyerError::Storage(_))));
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_match_both_name_and_capacity() {
        let repo = setup().await;
        repo.save(new_bloc("Bloc1", 10)).await.unwrap();
        repo.save(new_bloc("Bloc1", 20)).await.unwrap();
        repo.save(new_bloc("Bloc2", 10)).await.unwrap();

        let result = repo
            .find_all_by_nom_bloc_and_capacite_bloc("Bloc1", 10)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].nom_bloc, "Bloc1");
        assert_eq!(result[0].capacite_bloc, 10);
    }
}
