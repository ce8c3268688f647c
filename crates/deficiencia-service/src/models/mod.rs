//! Deficiencia service models.
//!
//! Contains the domain record plus the request and response bodies used by
//! the HTTP layer.

use serde::{Deserialize, Serialize};

/// Deficiencia record.
///
/// Maps to the `deficiencia` table. `id` is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Deficiencia {
    /// Store-assigned identifier.
    pub id: i64,

    /// Business key used for lookup and delete.
    pub nome: String,
}

/// Request body for `POST /api/v1/deficiencias`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeficienciaRequest {
    pub nome: Option<String>,
}

impl CreateDeficienciaRequest {
    /// Returns the `nome` field when it is present and not blank.
    ///
    /// The value is returned exactly as sent; it is not trimmed.
    pub fn nome(&self) -> Option<&str> {
        self.nome
            .as_deref()
            .filter(|nome| !nome.trim().is_empty())
    }
}

/// Body returned by a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Readiness check response.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    /// "ready" or "not_ready".
    pub status: &'static str,

    /// Database connectivity status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
