use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_LLM_BASE_URL: &str = "http://localhost:11434/v1";
const DEFAULT_LLM_MODEL: &str = "llama3.2";
const DEFAULT_JUDGE_TIMEOUT_SECS: u64 = 60;

/// Application configuration loaded from environment variables.
/// Everything has a local-development default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// When unset, jobs are served from an in-memory store.
    pub database_url: Option<String>,
    /// JSON array of postings used to seed the in-memory store.
    pub jobs_seed_path: Option<PathBuf>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_api_key: Option<String>,
    /// Caller-side deadline for every semantic judgment.
    pub judge_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let judge_timeout_secs = match optional_env("JUDGE_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("JUDGE_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_JUDGE_TIMEOUT_SECS,
        };

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            jobs_seed_path: optional_env("JOBS_SEED_PATH").map(PathBuf::from),
            llm_base_url: optional_env("LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            llm_api_key: optional_env("LLM_API_KEY"),
            judge_timeout: Duration::from_secs(judge_timeout_secs),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Unset and blank both count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
