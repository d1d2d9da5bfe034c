//! Keyword advisor backends.
//!
//! `AppState` carries an `Arc<dyn KeywordAdvisor>`: `LlmKeywordAdvisor` when an
//! API key is configured, `UnconfiguredAdvisor` otherwise.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::llm_client::{prompts::JSON_ONLY_SYSTEM, LlmClient, LlmError};

use super::prompts::suggest_keywords_prompt;
use super::KeywordRequest;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Keyword suggestions are not configured")]
    Unavailable,

    #[error("Keyword advisor failed: {0}")]
    Llm(#[from] LlmError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSuggestion {
    /// Comma-separated; may be empty.
    pub suggested_keywords: String,
}

/// Model output. A missing or null field reads as no suggestion.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionWire {
    #[serde(default)]
    suggested_keywords: Option<String>,
}

impl From<SuggestionWire> for KeywordSuggestion {
    fn from(wire: SuggestionWire) -> Self {
        Self {
            suggested_keywords: wire.suggested_keywords.unwrap_or_default(),
        }
    }
}

#[async_trait]
pub trait KeywordAdvisor: Send + Sync {
    async fn suggest(&self, request: &KeywordRequest) -> Result<KeywordSuggestion, AdvisorError>;
}

pub struct LlmKeywordAdvisor {
    llm: LlmClient,
}

impl LlmKeywordAdvisor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl KeywordAdvisor for LlmKeywordAdvisor {
    async fn suggest(&self, request: &KeywordRequest) -> Result<KeywordSuggestion, AdvisorError> {
        let prompt = suggest_keywords_prompt(request);
        let wire: SuggestionWire = self.llm.call_json(&prompt, JSON_ONLY_SYSTEM).await?;
        let suggestion = KeywordSuggestion::from(wire);
        debug!(
            chars = suggestion.suggested_keywords.len(),
            "Keyword advisor answered"
        );
        Ok(suggestion)
    }
}

/// Used when no model is configured; every request reports unavailability.
pub struct UnconfiguredAdvisor;

#[async_trait]
impl KeywordAdvisor for UnconfiguredAdvisor {
    async fn suggest(&self, _request: &KeywordRequest) -> Result<KeywordSuggestion, AdvisorError> {
        Err(AdvisorError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tolerates_null_and_missing() {
        let null: SuggestionWire = serde_json::from_str(r#"{"suggestedKeywords": null}"#).unwrap();
        assert_eq!(KeywordSuggestion::from(null).suggested_keywords, "");
        let missing: SuggestionWire = serde_json::from_str("{}").unwrap();
        assert_eq!(KeywordSuggestion::from(missing).suggested_keywords, "");
        let some: SuggestionWire =
            serde_json::from_str(r#"{"suggestedKeywords": "Rust, Tokio"}"#).unwrap();
        assert_eq!(KeywordSuggestion::from(some).suggested_keywords, "Rust, Tokio");
    }

    #[tokio::test]
    async fn test_unconfigured_advisor_is_unavailable() {
        let err = UnconfiguredAdvisor
            .suggest(&KeywordRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisorError::Unavailable));
    }
}
