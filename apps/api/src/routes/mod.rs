pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::document::handlers as document;
use crate::export::handlers as export;
use crate::keywords::handlers as keywords;
use crate::render::handlers as preview;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document
        .route(
            "/api/v1/document",
            get(document::handle_get_document)
                .put(document::handle_import_document)
                .delete(document::handle_reset_document),
        )
        .route("/api/v1/document/edits", post(document::handle_apply_edit))
        // Preview
        .route("/api/v1/preview", get(preview::handle_preview))
        .route("/api/v1/preview/html", get(preview::handle_preview_html))
        // Export
        .route("/api/v1/export", post(export::handle_export))
        // Keywords
        .route(
            "/api/v1/keywords/suggest",
            post(keywords::handle_suggest_keywords),
        )
        .with_state(state)
}
