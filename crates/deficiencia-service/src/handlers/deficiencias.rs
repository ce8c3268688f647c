//! Deficiencia handlers.
//!
//! - `GET /api/v1/deficiencias` - List all
//! - `GET /api/v1/deficiencias/{nome}` - Find by name
//! - `POST /api/v1/deficiencias` - Create
//! - `DELETE /api/v1/deficiencias/{nome}` - Delete by name
//!
//! The 404 bodies for `buscar` and `deletar` are worded differently.
//! Clients match on both strings, keep them byte-for-byte.

use crate::errors::DsError;
use crate::models::{CreateDeficienciaRequest, Deficiencia, MessageResponse};
use crate::routes::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

/// 404 body for `buscar`.
pub const BUSCAR_NOT_FOUND_MESSAGE: &str = "Deficiencia não encontrado";

/// 404 body for `deletar`.
pub const DELETAR_NOT_FOUND_MESSAGE: &str = "Deficiência não encontrada";

/// 200 body for `deletar`.
pub const DELETED_MESSAGE: &str = "Deficiência deletada";

/// Handler for GET /api/v1/deficiencias
///
/// Always 200; an empty table yields `[]`.
#[instrument(skip_all, name = "ds.deficiencias.listar")]
pub async fn listar(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Deficiencia>>, DsError> {
    let rows = state.deficiencia_service.listar().await?;
    Ok(Json(rows))
}

/// Handler for GET /api/v1/deficiencias/{nome}
///
/// # Response
///
/// - 200 OK: the matching record
/// - 404 Not Found: `{"error": "Deficiencia não encontrado"}`
#[instrument(skip_all, name = "ds.deficiencias.buscar")]
pub async fn buscar(
    State(state): State<Arc<AppState>>,
    Path(nome): Path<String>,
) -> Result<Json<Deficiencia>, DsError> {
    state
        .deficiencia_service
        .buscar(&nome)
        .await?
        .map(Json)
        .ok_or_else(|| DsError::NotFound(BUSCAR_NOT_FOUND_MESSAGE.to_string()))
}

/// Handler for POST /api/v1/deficiencias
///
/// The body is deserialized by hand so malformed input gets a 400 with our
/// error shape instead of Axum's default 422.
///
/// # Response
///
/// - 201 Created: the record with its store-assigned id
/// - 400 Bad Request: malformed JSON, or `nome` missing/blank
#[instrument(skip_all, name = "ds.deficiencias.criar")]
pub async fn criar(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Deficiencia>), DsError> {
    let request: CreateDeficienciaRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(target: "ds.handlers.deficiencias", error = %e, "Invalid request body");
        DsError::BadRequest("Corpo da requisição inválido".to_string())
    })?;

    let nome = request
        .nome()
        .ok_or_else(|| DsError::BadRequest("O campo nome é obrigatório".to_string()))?;

    let created = state.deficiencia_service.criar(nome).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for DELETE /api/v1/deficiencias/{nome}
///
/// # Response
///
/// - 200 OK: `{"message": "Deficiência deletada"}`
/// - 404 Not Found: `{"error": "Deficiência não encontrada"}`
#[instrument(skip_all, name = "ds.deficiencias.deletar")]
pub async fn deletar(
    State(state): State<Arc<AppState>>,
    Path(nome): Path<String>,
) -> Result<Json<MessageResponse>, DsError> {
    if !state.deficiencia_service.deletar(&nome).await? {
        return Err(DsError::NotFound(DELETAR_NOT_FOUND_MESSAGE.to_string()));
    }

    Ok(Json(MessageResponse {
        message: DELETED_MESSAGE.to_string(),
    }))
}
