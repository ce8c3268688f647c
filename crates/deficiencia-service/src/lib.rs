//! Deficiencia Service Library
//!
//! HTTP API for the `deficiencia` catalogue: list, find by name, create and
//! delete, backed by MySQL.
//!
//! # Architecture
//!
//! Handler -> Service -> Repository:
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/*.rs -> repositories/*.rs
//! ```
//!
//! Each layer below the handlers sits behind a trait so tests can substitute
//! an in-memory repository or a recording service.
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Data models
//! - `observability` - Prometheus metrics
//! - `repositories` - SQL access
//! - `routes` - Axum router setup
//! - `services` - Operations called by handlers

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
