//! Analysis: builds the candidate profile and its analysis confidence.
//!
//! Flow: ask judge for profile JSON → parse (default profile on any failure) →
//!       override years with the rule-based duration → score confidence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::duration::extract_duration;
use crate::analysis::profile::{analysis_confidence, parse_profile};
use crate::analysis::prompts::{ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};
use crate::extraction::ExtractedDocument;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::JudgeHandle;
use crate::models::candidate::CandidateProfile;

pub mod duration;
pub mod profile;
pub mod prompts;

/// Output of the analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Profile with `years_of_experience` already overridden.
    pub skills_analysis: CandidateProfile,
    /// Mean of the skills, experience and education sub-scores, in [0, 1].
    pub confidence_score: f64,
    pub analyzed_at: DateTime<Utc>,
}

/// Runs the analysis stage. Never fails: judge errors and unparseable output
/// degrade to the default profile.
pub async fn analyze_profile(document: &ExtractedDocument, judge: &JudgeHandle) -> AnalysisResult {
    let prompt = ANALYSIS_PROMPT_TEMPLATE
        .replace("{structured_data}", &document.structured_data.to_string())
        .replace("{raw_text}", &document.raw_text);

    let system = format!("{ANALYSIS_SYSTEM} {JSON_ONLY_SYSTEM}");
    let mut profile = match judge.ask(&system, &prompt).await {
        Ok(text) => parse_profile(&text).unwrap_or_else(|e| {
            warn!("Profile judgment unparseable ({e}); using default profile");
            CandidateProfile::default()
        }),
        Err(e) => {
            warn!("Profile judgment failed ({e}); using default profile");
            CandidateProfile::default()
        }
    };

    profile.years_of_experience = rule_based_years(&document.raw_text);
    let confidence_score = analysis_confidence(&profile);

    info!(
        "Profile analysed: {} skills, {} years, confidence {}",
        profile.technical_skills.len(),
        profile.years_of_experience,
        confidence_score
    );

    AnalysisResult {
        skills_analysis: profile,
        confidence_score,
        analyzed_at: Utc::now(),
    }
}

fn rule_based_years(raw_text: &str) -> f64 {
    let years = extract_duration(raw_text);
    if years.is_finite() && years >= 0.0 {
        years
    } else {
        0.0
    }
}
