//! Service layer for the Deficiencia service.
//!
//! - `deficiencia_service` - operations called by the HTTP handlers

pub mod deficiencia_service;

pub use deficiencia_service::mock::{MockDeficienciaService, ServiceCall};
pub use deficiencia_service::{DeficienciaService, DeficienciaServiceTrait};
