//! Deficiencia repository for database operations.
//!
//! One parameterized statement per operation against the shared pool. Driver
//! result shapes (insert id, affected rows) are normalized into domain values
//! here so callers never see `MySqlQueryResult`.

use crate::errors::DsError;
use crate::models::Deficiencia;
use crate::observability::metrics;
use async_trait::async_trait;
use sqlx::MySqlPool;
use std::time::Instant;
use tracing::instrument;

/// Full table scan.
pub const SELECT_ALL_SQL: &str = "SELECT * FROM deficiencia";

/// Lookup by business key.
pub const SELECT_BY_NOME_SQL: &str = "SELECT * FROM deficiencia WHERE nome = ?";

/// Insert; the id comes back through `last_insert_id`.
pub const INSERT_SQL: &str = "INSERT INTO deficiencia (nome) VALUES (?)";

/// Delete by business key.
pub const DELETE_BY_NOME_SQL: &str = "DELETE FROM deficiencia WHERE nome = ?";

/// Storage operations for Deficiencia records.
#[async_trait]
pub trait DeficienciaRepositoryTrait: Send + Sync {
    /// All rows in store order. An empty table yields an empty vec.
    async fn get_all(&self) -> Result<Vec<Deficiencia>, DsError>;

    /// First row whose `nome` matches, or `None`.
    async fn get_by_name(&self, nome: &str) -> Result<Option<Deficiencia>, DsError>;

    /// Inserts a row and returns it with the store-assigned id.
    async fn create(&self, nome: &str) -> Result<Deficiencia, DsError>;

    /// Deletes rows matching `nome`. Returns whether any row was affected.
    async fn delete(&self, nome: &str) -> Result<bool, DsError>;
}

/// MySQL-backed repository.
#[derive(Clone)]
pub struct DeficienciaRepository {
    pool: MySqlPool,
}

impl DeficienciaRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeficienciaRepositoryTrait for DeficienciaRepository {
    #[instrument(skip_all, name = "ds.repo.get_all")]
    async fn get_all(&self) -> Result<Vec<Deficiencia>, DsError> {
        let start = Instant::now();

        let rows = sqlx::query_as::<_, Deficiencia>(SELECT_ALL_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                metrics::record_db_query("get_all", "error", start.elapsed());
                DsError::Database(format!("Failed to list deficiencias: {}", e))
            })?;

        metrics::record_db_query("get_all", "success", start.elapsed());

        Ok(rows)
    }

    #[instrument(skip_all, name = "ds.repo.get_by_name")]
    async fn get_by_name(&self, nome: &str) -> Result<Option<Deficiencia>, DsError> {
        let start = Instant::now();

        let row = sqlx::query_as::<_, Deficiencia>(SELECT_BY_NOME_SQL)
            .bind(nome)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                metrics::record_db_query("get_by_name", "error", start.elapsed());
                DsError::Database(format!("Failed to fetch deficiencia by nome: {}", e))
            })?;

        metrics::record_db_query("get_by_name", "success", start.elapsed());

        Ok(row)
    }

    #[instrument(skip_all, name = "ds.repo.create")]
    async fn create(&self, nome: &str) -> Result<Deficiencia, DsError> {
        let start = Instant::now();

        let result = sqlx::query(INSERT_SQL)
            .bind(nome)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                metrics::record_db_query("create", "error", start.elapsed());
                DsError::Database(format!("Failed to insert deficiencia: {}", e))
            })?;

        metrics::record_db_query("create", "success", start.elapsed());

        let id = i64::try_from(result.last_insert_id()).map_err(|_| {
            tracing::error!(
                target: "ds.repo",
                insert_id = result.last_insert_id(),
                "Insert id does not fit in i64"
            );
            DsError::Internal
        })?;

        Ok(Deficiencia {
            id,
            nome: nome.to_string(),
        })
    }

    #[instrument(skip_all, name = "ds.repo.delete")]
    async fn delete(&self, nome: &str) -> Result<bool, DsError> {
        let start = Instant::now();

        let result = sqlx::query(DELETE_BY_NOME_SQL)
            .bind(nome)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                metrics::record_db_query("delete", "error", start.elapsed());
                DsError::Database(format!("Failed to delete deficiencia: {}", e))
            })?;

        metrics::record_db_query("delete", "success", start.elapsed());

        Ok(result.rows_affected() > 0)
    }
}

/// In-memory repository for tests.
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Table {
        rows: Vec<Deficiencia>,
        last_id: i64,
    }

    /// Repository backed by a `Vec`, with ids assigned like AUTO_INCREMENT.
    #[derive(Default)]
    pub struct InMemoryDeficienciaRepository {
        table: Mutex<Table>,
        return_error: bool,
    }

    impl InMemoryDeficienciaRepository {
        /// Create an empty repository.
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a repository pre-populated with rows. Later inserts get ids
        /// above the highest seeded id.
        pub fn with_rows(rows: Vec<Deficiencia>) -> Self {
            let last_id = rows.iter().map(|row| row.id).max().unwrap_or(0);
            Self {
                table: Mutex::new(Table { rows, last_id }),
                return_error: false,
            }
        }

        /// Create a repository whose every call fails like an unreachable store.
        pub fn failing() -> Self {
            Self {
                table: Mutex::new(Table::default()),
                return_error: true,
            }
        }

        fn with_table<T>(&self, f: impl FnOnce(&mut Table) -> T) -> Result<T, DsError> {
            if self.return_error {
                return Err(DsError::Database("Mock repository error".to_string()));
            }
            let mut table = self.table.lock().map_err(|_| DsError::Internal)?;
            Ok(f(&mut table))
        }
    }

    #[async_trait]
    impl DeficienciaRepositoryTrait for InMemoryDeficienciaRepository {
        async fn get_all(&self) -> Result<Vec<Deficiencia>, DsError> {
            self.with_table(|table| table.rows.clone())
        }

        async fn get_by_name(&self, nome: &str) -> Result<Option<Deficiencia>, DsError> {
            self.with_table(|table| table.rows.iter().find(|row| row.nome == nome).cloned())
        }

        async fn create(&self, nome: &str) -> Result<Deficiencia, DsError> {
            self.with_table(|table| {
                table.last_id += 1;
                let row = Deficiencia {
                    id: table.last_id,
                    nome: nome.to_string(),
                };
                table.rows.push(row.clone());
                row
            })
        }

        async fn delete(&self, nome: &str) -> Result<bool, DsError> {
            self.with_table(|table| {
                let before = table.rows.len();
                table.rows.retain(|row| row.nome != nome);
                table.rows.len() < before
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_are_positional() {
        assert_eq!(SELECT_ALL_SQL, "SELECT * FROM deficiencia");
        assert_eq!(
            SELECT_BY_NOME_SQL,
            "SELECT * FROM deficiencia WHERE nome = ?"
        );
        assert_eq!(INSERT_SQL, "INSERT INTO deficiencia (nome) VALUES (?)");
        assert_eq!(
            DELETE_BY_NOME_SQL,
            "DELETE FROM deficiencia WHERE nome = ?"
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_all_empty_table(pool: MySqlPool) -> Result<(), DsError> {
        let repo = DeficienciaRepository::new(pool);

        let rows = repo.get_all().await?;
        assert!(rows.is_empty());

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_all_returns_every_row(pool: MySqlPool) -> Result<(), DsError> {
        let repo = DeficienciaRepository::new(pool);
        let visual = repo.create("Deficiência Visual").await?;
        let auditiva = repo.create("Deficiência Auditiva").await?;

        let mut rows = repo.get_all().await?;
        rows.sort_by_key(|row| row.id);

        assert_eq!(rows, vec![visual, auditiva]);

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_create_then_get_by_name(pool: MySqlPool) -> Result<(), DsError> {
        let repo = DeficienciaRepository::new(pool);

        let created = repo.create("Deficiência Motora").await?;
        assert_eq!(created.nome, "Deficiência Motora");
        assert!(created.id > 0);

        let found = repo.get_by_name("Deficiência Motora").await?;
        assert_eq!(found, Some(created));

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_create_assigns_increasing_ids(pool: MySqlPool) -> Result<(), DsError> {
        let repo = DeficienciaRepository::new(pool);

        let first = repo.create("Deficiência Visual").await?;
        let second = repo.create("Deficiência Auditiva").await?;

        assert!(second.id > first.id);

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_by_name_not_found(pool: MySqlPool) -> Result<(), DsError> {
        let repo = DeficienciaRepository::new(pool);

        let found = repo.get_by_name("Deficiência Visual").await?;
        assert!(found.is_none());

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_by_name_returns_first_of_duplicates(pool: MySqlPool) -> Result<(), DsError> {
        let repo = DeficienciaRepository::new(pool);
        let first = repo.create("Deficiência Intelectual").await?;
        let second = repo.create("Deficiência Intelectual").await?;
        assert_ne!(first.id, second.id);

        let found = repo.get_by_name("Deficiência Intelectual").await?;
        assert_eq!(found, Some(first));

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_by_name_matches_case_and_accents_exactly(
        pool: MySqlPool,
    ) -> Result<(), DsError> {
        let repo = DeficienciaRepository::new(pool);
        let accented = repo.create("Deficiência Física").await?;
        let plain = repo.create("Deficiencia Fisica").await?;
        let lower = repo.create("deficiência física").await?;

        assert_eq!(repo.get_by_name("Deficiência Física").await?, Some(accented.clone()));
        assert_eq!(repo.get_by_name("Deficiencia Fisica").await?, Some(plain.clone()));
        assert_eq!(repo.get_by_name("deficiência física").await?, Some(lower.clone()));
        assert!(repo.get_by_name("DEFICIÊNCIA FÍSICA").await?.is_none());

        let mut rows = repo.get_all().await?;
        rows.sort_by_key(|row| row.id);
        assert_eq!(rows, vec![accented, plain, lower]);

        assert!(repo.delete("Deficiencia Fisica").await?);
        assert_eq!(repo.get_all().await?.len(), 2);

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_delete_existing_returns_true(pool: MySqlPool) -> Result<(), DsError> {
        let repo = DeficienciaRepository::new(pool);
        repo.create("Deficiência Visual").await?;

        assert!(repo.delete("Deficiência Visual").await?);
        assert!(repo.get_by_name("Deficiência Visual").await?.is_none());

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_delete_missing_returns_false(pool: MySqlPool) -> Result<(), DsError> {
        let repo = DeficienciaRepository::new(pool);

        assert!(!repo.delete("Defiencia Fisica").await?);

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_delete_is_idempotent(pool: MySqlPool) -> Result<(), DsError> {
        let repo = DeficienciaRepository::new(pool);
        repo.create("Deficiência Auditiva").await?;

        assert!(repo.delete("Deficiência Auditiva").await?);
        assert!(!repo.delete("Deficiência Auditiva").await?);

        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_closed_pool_surfaces_database_error(pool: MySqlPool) -> Result<(), DsError> {
        pool.close().await;
        let repo = DeficienciaRepository::new(pool);

        let result = repo.get_all().await;
        assert!(matches!(result, Err(DsError::Database(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_in_memory_mirrors_store_semantics() {
        let repo = mock::InMemoryDeficienciaRepository::new();

        assert!(repo.get_all().await.unwrap().is_empty());

        let created = repo.create("Deficiência Motora").await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(
            repo.get_by_name("Deficiência Motora").await.unwrap(),
            Some(created)
        );

        assert!(repo.delete("Deficiência Motora").await.unwrap());
        assert!(!repo.delete("Deficiência Motora").await.unwrap());
    }

    #[tokio::test]
    async fn test_in_memory_seeded_ids_continue() {
        let repo = mock::InMemoryDeficienciaRepository::with_rows(vec![Deficiencia {
            id: 7,
            nome: "Deficiência Visual".to_string(),
        }]);

        let created = repo.create("Deficiência Auditiva").await.unwrap();
        assert_eq!(created.id, 8);
    }

    #[tokio::test]
    async fn test_in_memory_failing() {
        let repo = mock::InMemoryDeficienciaRepository::failing();

        assert!(matches!(
            repo.get_all().await,
            Err(DsError::Database(_))
        ));
    }
}
