mod config;
mod document;
mod errors;
mod export;
mod gate;
mod keywords;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::document::session::ResumeSession;
use crate::export::{Exporter, GlyphRasterizer};
use crate::keywords::{KeywordAdvisor, LlmKeywordAdvisor, UnconfiguredAdvisor};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{open_store, PersistenceAdapter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeFlow API v{}", env!("CARGO_PKG_VERSION"));

    // Document store
    let store = open_store(&config.store_url)?;
    info!("Document store opened at {}", config.store_url);
    let persistence = PersistenceAdapter::new(store);
    let session = tokio::task::spawn_blocking(move || ResumeSession::open(persistence)).await?;
    let session = Arc::new(session);

    // Export pipeline
    let exporter = Exporter::new(Arc::new(GlyphRasterizer::new(config.export_scale)));
    info!("Exporter ready (raster scale {})", config.export_scale);

    // Keyword advisor
    let advisor: Arc<dyn KeywordAdvisor> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("Keyword advisor initialized (model: {})", llm_client::MODEL);
            Arc::new(LlmKeywordAdvisor::new(llm))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; keyword suggestions are disabled");
            Arc::new(UnconfiguredAdvisor)
        }
    };

    let state = AppState::new(session, exporter, advisor, config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
