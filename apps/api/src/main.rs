mod config;
mod errors;
mod llm_client;
mod refinement;
mod routes;
mod session;
mod state;
mod views;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::refinement::{GeminiRefiner, Refiner};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Prompt Architect v{}", env!("CARGO_PKG_VERSION"));

    if config.gemini_api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; refinement calls will be rejected by the API");
    }

    // Initialize LLM client and refiner
    let llm = GeminiClient::new(config.gemini_api_key.clone(), &config.gemini_api_base);
    let refiner: Arc<dyn Refiner> = match config.load_refine_instruction()? {
        Some(instruction) => {
            info!("Using refinement instruction from {:?}", config.refine_instruction_path);
            Arc::new(GeminiRefiner::with_instruction(llm, instruction))
        }
        None => Arc::new(GeminiRefiner::new(llm)),
    };
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Build app state
    let state = AppState::new(refiner);

    // Close sessions whose page was abandoned
    let sweep_every = (config.session_ttl / 4).max(Duration::from_secs(1));
    let _sweeper = state.sessions.spawn_sweeper(config.session_ttl, sweep_every);
    info!("Idle sessions expire after {:?}", config.session_ttl);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
