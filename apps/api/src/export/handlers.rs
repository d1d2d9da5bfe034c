//! Axum route handler for exports.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/export
///
/// Exports the current document in its selected format and returns the file.
/// One export at a time; a concurrent request gets 409.
pub async fn handle_export(State(state): State<AppState>) -> Result<Response, AppError> {
    let _in_flight = state
        .export_gate
        .try_enter()
        .ok_or_else(|| AppError::Conflict("An export is already in progress".to_string()))?;

    let doc = state.session.snapshot();
    info!(
        format = doc.additional_options.export_format.name(),
        "Export requested"
    );
    let artifact = state.exporter.export(&doc, state.session.preview()).await?;

    let disposition = format!("attachment; filename=\"{}\"", artifact.filename);
    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response())
}
