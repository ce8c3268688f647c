//! HTTP request handlers for the Deficiencia service.

pub mod deficiencias;
pub mod health;
pub mod metrics;

pub use deficiencias::{buscar, criar, deletar, listar};
pub use health::{health_check, readiness_check};
pub use metrics::metrics_handler;
