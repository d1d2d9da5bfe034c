//! Axum route handlers for the preview API.

use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use serde::Deserialize;

use crate::state::AppState;

use super::{project_named, project_selected, render_preview_html, RenderedResume};

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    /// Template name; unknown names render `Modern`. Absent means the
    /// document's own template.
    pub template: Option<String>,
}

/// GET /api/v1/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Json<RenderedResume> {
    let doc = state.session.snapshot();
    let rendered = match query.template.as_deref() {
        Some(name) => project_named(&doc, name),
        None => match state.session.preview() {
            Some(surface) => surface.resume().clone(),
            None => project_selected(&doc),
        },
    };
    Json(rendered)
}

/// GET /api/v1/preview/html
pub async fn handle_preview_html(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Html<String> {
    match (query.template.as_deref(), state.session.preview()) {
        (Some(name), _) => {
            let doc = state.session.snapshot();
            Html(render_preview_html(&project_named(&doc, name), true))
        }
        (None, Some(surface)) => Html(surface.to_html()),
        (None, None) => {
            let doc = state.session.snapshot();
            Html(render_preview_html(&project_selected(&doc), true))
        }
    }
}
