//! Matching: finds candidate jobs and ranks them by hybrid score.
//!
//! Flow: query store (level + skills) → retry without level if empty →
//!       per job: semantic verdict + fuzzy + keyword → keep ≥ 40 → rank.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::jobs::{JobStore, JobStoreError};
use crate::llm_client::JudgeHandle;
use crate::matching::hybrid::{
    fuzzy_component, hybrid_score, keyword_component, to_percent, MatchComponents,
};
use crate::matching::semantic::judge_match;
use crate::models::candidate::{CandidateProfile, ExperienceLevel};
use crate::models::job::JobPosting;
use crate::scoring::HybridWeights;

pub mod hybrid;
pub mod prompts;
pub mod semantic;

/// Jobs scoring below this are dropped.
pub const MIN_MATCH_SCORE: u8 = 40;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job: JobPosting,
    pub match_score: u8,
    pub semantic_component: u8,
    pub fuzzy_component: u8,
    pub keyword_component: u8,
    pub rationale: String,
}

/// Output of the matching stage, ranked by `match_score` descending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobMatches {
    pub matched_jobs: Vec<MatchResult>,
    pub count: usize,
}

impl JobMatches {
    pub fn best(&self) -> Option<&MatchResult> {
        self.matched_jobs.first()
    }

    pub fn best_score(&self) -> u8 {
        self.matched_jobs
            .iter()
            .map(|m| m.match_score)
            .max()
            .unwrap_or(0)
    }
}

/// Level-filtered query, falling back to the same query without the level when
/// the filtered one comes back empty.
pub async fn find_candidate_jobs(
    store: &dyn JobStore,
    skills: &BTreeSet<String>,
    level: Option<ExperienceLevel>,
) -> Result<Vec<JobPosting>, JobStoreError> {
    let jobs = store.find(skills, level).await?;
    match level {
        Some(level) if jobs.is_empty() => {
            info!(
                "No jobs found at level {}; retrying without level filter",
                level.as_str()
            );
            store.find(skills, None).await
        }
        _ => Ok(jobs),
    }
}

/// Runs the matching stage. Zero matching jobs is a valid, empty result; only a
/// store failure is an error.
pub async fn match_jobs(
    profile: &CandidateProfile,
    store: &dyn JobStore,
    judge: &JudgeHandle,
) -> Result<JobMatches, JobStoreError> {
    let skills = &profile.technical_skills;
    let jobs = find_candidate_jobs(store, skills, profile.experience_level).await?;
    info!("Scoring {} candidate jobs", jobs.len());

    let weights = HybridWeights::default();
    let mut matched_jobs = Vec::new();

    for job in jobs {
        let requirements: Vec<String> = job.requirements.iter().map(|r| r.to_lowercase()).collect();
        let verdict = judge_match(judge, skills, &requirements).await;

        let components = MatchComponents {
            semantic: verdict.score / 100.0,
            fuzzy: fuzzy_component(skills, &requirements),
            keyword: keyword_component(skills, &requirements),
        };
        let match_score = hybrid_score(&components, &weights);
        debug!(
            "Job {} ({}): score={} components={:?}",
            job.id, job.title, match_score, components
        );

        if match_score >= MIN_MATCH_SCORE {
            matched_jobs.push(MatchResult {
                job,
                match_score,
                semantic_component: to_percent(components.semantic),
                fuzzy_component: to_percent(components.fuzzy),
                keyword_component: to_percent(components.keyword),
                rationale: verdict.rationale,
            });
        }
    }

    // stable: equal scores keep store order
    matched_jobs.sort_by(|a, b| b.match_score.cmp(&a.match_score));

    Ok(JobMatches {
        count: matched_jobs.len(),
        matched_jobs,
    })
}
