//! Axum route handlers for the document API.

use axum::{extract::State, Json};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::state::AppState;

use super::edit::Edit;

/// GET /api/v1/document
pub async fn handle_get_document(State(state): State<AppState>) -> Json<ResumeDocument> {
    Json(state.session.snapshot().as_ref().clone())
}

/// PUT /api/v1/document
///
/// Replaces the whole document. Any JSON is accepted; it goes through the
/// same sanitizer as stored data.
pub async fn handle_import_document(
    State(state): State<AppState>,
    Json(raw): Json<Value>,
) -> Json<ResumeDocument> {
    let doc = state.session.import(&raw).await;
    info!(entries = doc.entry_ids().len(), "Document imported");
    Json(doc.as_ref().clone())
}

/// DELETE /api/v1/document
pub async fn handle_reset_document(State(state): State<AppState>) -> Json<ResumeDocument> {
    Json(state.session.reset().await.as_ref().clone())
}

/// POST /api/v1/document/edits
pub async fn handle_apply_edit(
    State(state): State<AppState>,
    Json(raw): Json<Value>,
) -> Result<Json<ResumeDocument>, AppError> {
    let edit: Edit = serde_json::from_value(raw)
        .map_err(|e| AppError::Validation(format!("invalid edit: {e}")))?;
    let doc = state.session.apply(&edit).await?;
    Ok(Json(doc.as_ref().clone()))
}
