use std::sync::Arc;

use crate::config::Config;
use crate::jobs::JobStore;
use crate::llm_client::JudgeHandle;
use crate::workflow::progress::ProgressReporter;

/// Shared application state injected into all route handlers via Axum extractors.
/// Each request builds its own workflow context; nothing mutable is shared here.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable job store. PostgreSQL when `DATABASE_URL` is set, in-memory otherwise.
    pub jobs: Arc<dyn JobStore>,
    pub judge: JudgeHandle,
    /// Receives stage progress for every workflow run.
    pub progress: Arc<dyn ProgressReporter>,
    pub config: Config,
}

#[cfg(test)]
impl AppState {
    /// State wired to the given store and judge with local-development config.
    pub fn for_tests(jobs: Arc<dyn JobStore>, judge: JudgeHandle) -> Self {
        Self {
            jobs,
            judge,
            progress: Arc::new(crate::workflow::progress::TracingProgress),
            config: Config {
                database_url: None,
                jobs_seed_path: None,
                llm_base_url: "http://localhost:11434/v1".to_string(),
                llm_model: "llama3.2".to_string(),
                llm_api_key: None,
                judge_timeout: std::time::Duration::from_secs(5),
                port: 8080,
                rust_log: "info".to_string(),
            },
        }
    }
}
