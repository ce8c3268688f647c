//! # Deficiencia Test Utilities
//!
//! Shared test utilities for the Deficiencia service.
//!
//! - Server test harness (`TestDeficienciaServer` for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use deficiencia_test_utils::*;
//!
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_example(pool: MySqlPool) -> Result<()> {
//!     let server = TestDeficienciaServer::spawn(pool).await?;
//!
//!     let response = reqwest::get(format!("{}/api/v1/deficiencias", server.url())).await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;

pub use server_harness::*;
