use std::sync::Arc;

use crate::config::Config;
use crate::document::session::ResumeSession;
use crate::export::Exporter;
use crate::gate::InFlightGate;
use crate::keywords::KeywordAdvisor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ResumeSession>,
    pub exporter: Exporter,
    /// Pluggable keyword backend. `LlmKeywordAdvisor` when an API key is set.
    pub advisor: Arc<dyn KeywordAdvisor>,
    pub export_gate: Arc<InFlightGate>,
    pub keyword_gate: Arc<InFlightGate>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        session: Arc<ResumeSession>,
        exporter: Exporter,
        advisor: Arc<dyn KeywordAdvisor>,
        config: Config,
    ) -> Self {
        Self {
            session,
            exporter,
            advisor,
            export_gate: Arc::default(),
            keyword_gate: Arc::default(),
            config,
        }
    }
}
