use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::document::edit::EditError;
use crate::export::ExportError;
use crate::keywords::AdvisorError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Export target missing")]
    ExportTargetMissing,

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Keyword advisor error: {0}")]
    Advisor(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<EditError> for AppError {
    fn from(e: EditError) -> Self {
        match e {
            EditError::EntryNotFound { .. } => AppError::NotFound(e.to_string()),
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::MissingRenderTarget => AppError::ExportTargetMissing,
            other => AppError::Export(other.to_string()),
        }
    }
}

impl From<AdvisorError> for AppError {
    fn from(e: AdvisorError) -> Self {
        AppError::Advisor(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::ExportTargetMissing => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXPORT_TARGET_MISSING",
                "Resume preview element not found".to_string(),
            ),
            AppError::Export(msg) => {
                tracing::error!("Export error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_FAILED",
                    "Could not generate the export. Please try again.".to_string(),
                )
            }
            AppError::Advisor(msg) => {
                tracing::error!("Keyword advisor error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "ADVISOR_ERROR",
                    "Could not suggest keywords. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_errors_map_to_status() {
        let missing: AppError = EditError::EntryNotFound {
            section: "education",
            id: "x".to_string(),
        }
        .into();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let bad: AppError = EditError::InvalidPath("nope".to_string()).into();
        assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_export_errors_map_to_status() {
        let missing: AppError = ExportError::MissingRenderTarget.into();
        assert_eq!(missing.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
        let failed: AppError = ExportError::Capture("x".to_string()).into();
        assert_eq!(failed.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_advisor_and_conflict_status() {
        let advisor: AppError = AdvisorError::Unavailable.into();
        assert_eq!(advisor.into_response().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::Conflict("busy".to_string()).into_response().status(),
            StatusCode::CONFLICT
        );
    }
}
