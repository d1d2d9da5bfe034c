//! Axum route handler for keyword suggestions.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::state::AppState;

use super::{suggest_keywords, SuggestionOutcome};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResponse {
    /// `"added"` or `"noNewKeywords"`.
    pub outcome: &'static str,
    pub keywords: String,
    pub added: Vec<String>,
}

/// POST /api/v1/keywords/suggest
///
/// Asks the advisor for keywords and merges new ones into the document.
pub async fn handle_suggest_keywords(
    State(state): State<AppState>,
) -> Result<Json<SuggestResponse>, AppError> {
    let _in_flight = state.keyword_gate.try_enter().ok_or_else(|| {
        AppError::Conflict("A keyword suggestion is already in progress".to_string())
    })?;

    let outcome = suggest_keywords(
        &state.session,
        state.advisor.as_ref(),
        state.config.keyword_matching,
    )
    .await?;

    let response = match outcome {
        SuggestionOutcome::Added { keywords, added } => SuggestResponse {
            outcome: "added",
            keywords,
            added,
        },
        SuggestionOutcome::NoNewKeywords => SuggestResponse {
            outcome: "noNewKeywords",
            keywords: state.session.snapshot().keywords.clone(),
            added: Vec::new(),
        },
    };
    Ok(Json(response))
}
