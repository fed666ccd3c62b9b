//! Screening: role-aware fit score combined with upstream confidences.
//!
//! The narrative summary is a supplement for humans; it never feeds the number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::analysis::AnalysisResult;
use crate::llm_client::JudgeHandle;
use crate::matching::JobMatches;
use crate::models::candidate::Education;
use crate::scoring::{round_to, ScreeningWeights};
use crate::screening::prompts::{SCREENING_PROMPT_TEMPLATE, SCREENING_SYSTEM};
use crate::screening::roles::role_specific_score;

pub mod prompts;
pub mod roles;

/// Role used when nothing matched.
pub const GENERAL_ROLE: &str = "general";
/// Education score when no entry names a recognised degree, including no entries.
pub const EDUCATION_DEFAULT_SCORE: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub final_score: f64,
    pub experience_fit: f64,
    pub education_score: f64,
    pub role_score: f64,
    /// Analysis confidence as a percentage.
    pub analyzer_confidence: f64,
    pub best_job_match: f64,
    pub computed_role: String,
}

/// Output of the screening stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub screening_score: ScreeningResult,
    pub screening_summary: String,
    pub screened_at: DateTime<Utc>,
}

pub fn experience_fit(years: f64) -> f64 {
    if years >= 3.0 {
        100.0
    } else if years >= 1.0 {
        60.0
    } else {
        30.0
    }
}

pub fn education_fit(education: &[Education]) -> f64 {
    let degrees: Vec<String> = education.iter().map(|e| e.degree.to_lowercase()).collect();
    if degrees
        .iter()
        .any(|d| d.contains("phd") || d.contains("master"))
    {
        100.0
    } else if degrees.iter().any(|d| d.contains("bachelor")) {
        80.0
    } else {
        EDUCATION_DEFAULT_SCORE
    }
}

/// Pure scoring half of the stage.
pub fn compute_screening_score(analysis: &AnalysisResult, matches: &JobMatches) -> ScreeningResult {
    let profile = &analysis.skills_analysis;
    let weights = ScreeningWeights::default();

    let (best_job_match, computed_role) = match matches.best() {
        Some(best) => (best.match_score as f64, best.job.title.clone()),
        None => (0.0, GENERAL_ROLE.to_string()),
    };

    let years = if profile.years_of_experience.is_finite() {
        profile.years_of_experience
    } else {
        0.0
    };
    let experience_fit = experience_fit(years);
    let education_score = education_fit(&profile.education);
    let role_score = role_specific_score(&computed_role, &profile.technical_skills);
    let analyzer_confidence = analysis.confidence_score * 100.0;

    let final_score = weights.best_job_match * best_job_match
        + weights.analyzer_confidence * analyzer_confidence
        + weights.education * education_score
        + weights.experience * experience_fit
        + weights.role * role_score;

    ScreeningResult {
        final_score: round_to(final_score, 2),
        experience_fit,
        education_score,
        role_score,
        analyzer_confidence: round_to(analyzer_confidence, 2),
        best_job_match,
        computed_role,
    }
}

/// Runs the screening stage. Never fails: a judge failure replaces the narrative
/// with a note.
pub async fn screen_candidate(
    analysis: &AnalysisResult,
    matches: &JobMatches,
    judge: &JudgeHandle,
) -> ScreeningReport {
    let screening_score = compute_screening_score(analysis, matches);
    info!(
        "Screening score {} for role '{}'",
        screening_score.final_score, screening_score.computed_role
    );

    let context = json!({
        "analysis_results": analysis,
        "job_matches": matches,
        "screening_score": &screening_score,
    });
    let prompt = SCREENING_PROMPT_TEMPLATE
        .replace("{role}", &screening_score.computed_role)
        .replace(
            "{context}",
            &serde_json::to_string_pretty(&context).unwrap_or_default(),
        );

    let screening_summary = match judge.ask(SCREENING_SYSTEM, &prompt).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("Screening narrative failed: {e}");
            format!("Screening summary unavailable: {e}")
        }
    };

    ScreeningReport {
        screening_score,
        screening_summary,
        screened_at: Utc::now(),
    }
}
