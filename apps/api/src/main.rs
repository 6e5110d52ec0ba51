mod config;
mod errors;
mod generation;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::render::PdfLayout;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter(&config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Datasheet API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::from_config(&config)?;
    info!(
        "LLM client initialized (default model: {}, attempts: {})",
        config.default_model, config.llm_max_attempts
    );

    match config.existing_template() {
        Some(path) => info!("DOCX template: {}", path.display()),
        None => warn!(
            "DOCX template {} not found; exports will use a blank document",
            config.template_path.display()
        ),
    }

    let pdf_layout = PdfLayout::default();
    info!(
        "PDF layout: {}x{} mm, {}pt, {} chars/line",
        pdf_layout.page_width_mm,
        pdf_layout.page_height_mm,
        pdf_layout.font_size_pt,
        pdf_layout.chars_per_line()
    );

    let state = AppState {
        llm: Arc::new(llm),
        config: config.clone(),
        pdf_layout,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the form frontend has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Filter used when `RUST_LOG` holds no valid directive: the crate at the
/// configured level plus TraceLayer's request spans.
fn default_log_filter(level: &str) -> String {
    format!("{}={level},tower_http=debug", env!("CARGO_CRATE_NAME"))
}
