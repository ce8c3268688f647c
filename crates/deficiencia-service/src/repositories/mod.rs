//! Repository layer for the Deficiencia service.
//!
//! Database access for the Handler -> Service -> Repository architecture.

pub mod deficiencias;

pub use deficiencias::mock::InMemoryDeficienciaRepository;
pub use deficiencias::{DeficienciaRepository, DeficienciaRepositoryTrait};
