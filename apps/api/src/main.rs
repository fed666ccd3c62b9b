mod analysis;
mod config;
mod errors;
mod extraction;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod recommendation;
mod routes;
mod scoring;
mod screening;
mod state;
mod workflow;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::jobs::memory::InMemoryJobStore;
use crate::jobs::postgres::PgJobStore;
use crate::jobs::JobStore;
use crate::llm_client::{JudgeHandle, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;
use crate::workflow::progress::TracingProgress;

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

    info!("Starting Talent API v{}", env!("CARGO_PKG_VERSION"));

    let jobs = build_job_store(&config).await?;

    // Initialize LLM client
    let llm = LlmClient::new(
        &config.llm_base_url,
        config.llm_model.clone(),
        config.llm_api_key.clone(),
    )?;
    info!(
        "LLM client initialized (model: {}, timeout: {:?})",
        llm.model(),
        config.judge_timeout
    );
    let judge = JudgeHandle::new(Arc::new(llm), config.judge_timeout);

    let state = AppState {
        jobs,
        judge,
        progress: Arc::new(TracingProgress),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set; otherwise an in-memory store, seeded
/// from `JOBS_SEED_PATH` if given.
async fn build_job_store(config: &Config) -> Result<Arc<dyn JobStore>> {
    if let Some(url) = &config.database_url {
        return Ok(Arc::new(PgJobStore::connect(url).await?));
    }
    let store = match &config.jobs_seed_path {
        Some(path) => InMemoryJobStore::from_seed_file(path)?,
        None => {
            info!("No DATABASE_URL or JOBS_SEED_PATH; starting with an empty job store");
            InMemoryJobStore::default()
        }
    };
    Ok(Arc::new(store))
}
