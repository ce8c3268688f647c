//! Observability for the Deficiencia service.
//!
//! Provides metrics definitions and recording helpers.

pub mod metrics;
