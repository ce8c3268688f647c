//! Deficiencia service.
//!
//! The layer handlers talk to. Handlers hold it as
//! `Arc<dyn DeficienciaServiceTrait>` so tests can swap in
//! [`mock::MockDeficienciaService`] and assert on the exact calls made.

use crate::errors::DsError;
use crate::models::Deficiencia;
use crate::repositories::DeficienciaRepositoryTrait;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Operations exposed to the HTTP layer.
#[async_trait]
pub trait DeficienciaServiceTrait: Send + Sync {
    /// Every registered deficiencia.
    async fn listar(&self) -> Result<Vec<Deficiencia>, DsError>;

    /// Lookup by name. `None` when nothing matches.
    async fn buscar(&self, nome: &str) -> Result<Option<Deficiencia>, DsError>;

    /// Register a new deficiencia.
    async fn criar(&self, nome: &str) -> Result<Deficiencia, DsError>;

    /// Remove by name. `false` when nothing matched.
    async fn deletar(&self, nome: &str) -> Result<bool, DsError>;
}

/// Production service backed by a repository.
pub struct DeficienciaService {
    repository: Arc<dyn DeficienciaRepositoryTrait>,
}

impl DeficienciaService {
    pub fn new(repository: Arc<dyn DeficienciaRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl DeficienciaServiceTrait for DeficienciaService {
    #[instrument(skip_all, name = "ds.service.listar")]
    async fn listar(&self) -> Result<Vec<Deficiencia>, DsError> {
        let rows = self.repository.get_all().await?;
        debug!(target: "ds.service", count = rows.len(), "Listed deficiencias");
        Ok(rows)
    }

    #[instrument(skip_all, name = "ds.service.buscar")]
    async fn buscar(&self, nome: &str) -> Result<Option<Deficiencia>, DsError> {
        let found = self.repository.get_by_name(nome).await?;
        debug!(target: "ds.service", found = found.is_some(), "Looked up deficiencia");
        Ok(found)
    }

    #[instrument(skip_all, name = "ds.service.criar")]
    async fn criar(&self, nome: &str) -> Result<Deficiencia, DsError> {
        let created = self.repository.create(nome).await?;
        info!(target: "ds.service", id = created.id, "Deficiencia created");
        Ok(created)
    }

    #[instrument(skip_all, name = "ds.service.deletar")]
    async fn deletar(&self, nome: &str) -> Result<bool, DsError> {
        let deleted = self.repository.delete(nome).await?;
        if deleted {
            info!(target: "ds.service", "Deficiencia deleted");
        } else {
            debug!(target: "ds.service", "Delete matched no rows");
        }
        Ok(deleted)
    }
}

/// Recording mock for handler tests.
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// A call received by the mock, with its argument.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ServiceCall {
        Listar,
        Buscar(String),
        Criar(String),
        Deletar(String),
    }

    /// Mock service returning canned responses.
    ///
    /// Without an explicit `with_criar`, `criar` echoes the name back with id 1.
    #[derive(Default)]
    pub struct MockDeficienciaService {
        listar_response: Vec<Deficiencia>,
        buscar_response: Option<Deficiencia>,
        criar_response: Option<Deficiencia>,
        deletar_response: bool,
        return_error: bool,
        calls: Mutex<Vec<ServiceCall>>,
    }

    impl MockDeficienciaService {
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock whose every call fails with a database error.
        pub fn failing() -> Self {
            Self {
                return_error: true,
                ..Self::default()
            }
        }

        pub fn with_listar(mut self, rows: Vec<Deficiencia>) -> Self {
            self.listar_response = rows;
            self
        }

        pub fn with_buscar(mut self, found: Option<Deficiencia>) -> Self {
            self.buscar_response = found;
            self
        }

        pub fn with_criar(mut self, created: Deficiencia) -> Self {
            self.criar_response = Some(created);
            self
        }

        pub fn with_deletar(mut self, deleted: bool) -> Self {
            self.deletar_response = deleted;
            self
        }

        /// Calls received so far, in order.
        pub fn calls(&self) -> Vec<ServiceCall> {
            self.calls
                .lock()
                .map(|calls| calls.clone())
                .unwrap_or_default()
        }

        fn record(&self, call: ServiceCall) -> Result<(), DsError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(call);
            }
            if self.return_error {
                return Err(DsError::Database("Mock service error".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DeficienciaServiceTrait for MockDeficienciaService {
        async fn listar(&self) -> Result<Vec<Deficiencia>, DsError> {
            self.record(ServiceCall::Listar)?;
            Ok(self.listar_response.clone())
        }

        async fn buscar(&self, nome: &str) -> Result<Option<Deficiencia>, DsError> {
            self.record(ServiceCall::Buscar(nome.to_string()))?;
            Ok(self.buscar_response.clone())
        }

        async fn criar(&self, nome: &str) -> Result<Deficiencia, DsError> {
            self.record(ServiceCall::Criar(nome.to_string()))?;
            Ok(self.criar_response.clone().unwrap_or_else(|| Deficiencia {
                id: 1,
                nome: nome.to_string(),
            }))
        }

        async fn deletar(&self, nome: &str) -> Result<bool, DsError> {
            self.record(ServiceCall::Deletar(nome.to_string()))?;
            Ok(self.deletar_response)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryDeficienciaRepository;

    fn deficiencia(id: i64, nome: &str) -> Deficiencia {
        Deficiencia {
            id,
            nome: nome.to_string(),
        }
    }

    fn service_with(rows: Vec<Deficiencia>) -> DeficienciaService {
        DeficienciaService::new(Arc::new(InMemoryDeficienciaRepository::with_rows(rows)))
    }

    #[tokio::test]
    async fn test_listar_returns_repository_rows() {
        let rows = vec![
            deficiencia(1, "Deficiência Visual"),
            deficiencia(2, "Deficiência Auditiva"),
        ];
        let service = service_with(rows.clone());

        assert_eq!(service.listar().await.unwrap(), rows);
    }

    #[tokio::test]
    async fn test_listar_empty() {
        let service = service_with(vec![]);
        assert!(service.listar().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_buscar_found_and_missing() {
        let service = service_with(vec![deficiencia(3, "Deficiência Motora")]);

        assert_eq!(
            service.buscar("Deficiência Motora").await.unwrap(),
            Some(deficiencia(3, "Deficiência Motora"))
        );
        assert_eq!(service.buscar("Deficiência Inexistente").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_criar_then_buscar() {
        let service = service_with(vec![
            deficiencia(1, "Deficiência Visual"),
            deficiencia(2, "Deficiência Auditiva"),
        ]);

        let created = service.criar("Deficiência Motora").await.unwrap();
        assert_eq!(created, deficiencia(3, "Deficiência Motora"));
        assert_eq!(
            service.buscar("Deficiência Motora").await.unwrap(),
            Some(created)
        );
    }

    #[tokio::test]
    async fn test_deletar_reports_whether_row_existed() {
        let service = service_with(vec![deficiencia(1, "Deficiência Visual")]);

        assert!(service.deletar("Deficiência Visual").await.unwrap());
        assert!(!service.deletar("Deficiência Visual").await.unwrap());
    }

    #[tokio::test]
    async fn test_repository_errors_propagate() {
        let service =
            DeficienciaService::new(Arc::new(InMemoryDeficienciaRepository::failing()));

        assert!(matches!(service.listar().await, Err(DsError::Database(_))));
        assert!(matches!(
            service.criar("Deficiência Motora").await,
            Err(DsError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_mock_records_calls_in_order() {
        let mock = mock::MockDeficienciaService::new().with_deletar(true);

        mock.listar().await.unwrap();
        mock.buscar("a").await.unwrap();
        mock.criar("b").await.unwrap();
        assert!(mock.deletar("c").await.unwrap());

        assert_eq!(
            mock.calls(),
            vec![
                mock::ServiceCall::Listar,
                mock::ServiceCall::Buscar("a".to_string()),
                mock::ServiceCall::Criar("b".to_string()),
                mock::ServiceCall::Deletar("c".to_string()),
            ]
        );
    }
}
