//! Test server harness for E2E testing
//!
//! Provides `TestDeficienciaServer` for spawning real server instances in tests.

use deficiencia_service::config::Config;
use deficiencia_service::observability::metrics::init_metrics_recorder;
use deficiencia_service::repositories::DeficienciaRepository;
use deficiencia_service::routes::{self, AppState};
use deficiencia_service::services::DeficienciaService;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sqlx::MySqlPool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;

/// The global recorder can only be installed once per process.
static TEST_METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn test_metrics_handle() -> PrometheusHandle {
    TEST_METRICS_HANDLE
        .get_or_init(|| {
            init_metrics_recorder()
                .unwrap_or_else(|_| PrometheusBuilder::new().build_recorder().handle())
        })
        .clone()
}

/// Test harness for spawning the Deficiencia service in E2E tests.
///
/// Wires the production repository and service over the given pool, so
/// requests hit the real SQL.
pub struct TestDeficienciaServer {
    addr: SocketAddr,
    pool: MySqlPool,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestDeficienciaServer {
    /// Spawn a new test server instance with isolated database.
    ///
    /// The server binds to a random available port (127.0.0.1:0) and runs
    /// in a background task until dropped.
    pub async fn spawn(pool: MySqlPool) -> Result<Self, anyhow::Error> {
        let vars = HashMap::from([
            (
                "DATABASE_URL".to_string(),
                "mysql://test/test".to_string(),
            ),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("DRAIN_SECONDS".to_string(), "0".to_string()),
        ]);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let repository = Arc::new(DeficienciaRepository::new(pool.clone()));
        let state = Arc::new(AppState {
            pool: pool.clone(),
            config: config.clone(),
            deficiencia_service: Arc::new(DeficienciaService::new(repository)),
        });

        let app = routes::build_routes(state, test_metrics_handle());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            pool,
            config,
            _handle: handle,
        })
    }

    /// Get reference to the database pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// URL of the collection endpoint.
    pub fn deficiencias_url(&self) -> String {
        format!("{}/api/v1/deficiencias", self.url())
    }

    /// URL of a single record, with `nome` percent-encoded.
    pub fn deficiencia_url(&self, nome: &str) -> String {
        let mut url = reqwest::Url::parse(&self.deficiencias_url())
            .expect("test server URL should parse");
        url.path_segments_mut()
            .expect("http URL can have path segments")
            .push(nome);
        url.to_string()
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestDeficienciaServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
