//! Job store: the flat, queryable collection of postings the matcher reads from.
//!
//! Two backends share the `JobStore` trait: PostgreSQL for deployments and an
//! in-memory store for local runs and tests. `AppState` holds an `Arc<dyn JobStore>`.

use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::candidate::ExperienceLevel;
use crate::models::job::{JobPosting, NewJobPosting};

pub mod handlers;
pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum JobStoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to read job seed file {path}: {source}")]
    SeedRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Job seed file is not a JSON array of postings: {0}")]
    SeedFormat(#[from] serde_json::Error),

    #[error("Job store lock poisoned")]
    Poisoned,
}

/// Read/write interface of the job store.
///
/// `find` returns postings whose requirements mention any of `skills` (substring,
/// case-insensitive), restricted to `level` when one is given. An empty skill set
/// places no skill restriction. Results come back in store order.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find(
        &self,
        skills: &BTreeSet<String>,
        level: Option<ExperienceLevel>,
    ) -> Result<Vec<JobPosting>, JobStoreError>;

    async fn insert(&self, job: NewJobPosting) -> Result<i64, JobStoreError>;
}
