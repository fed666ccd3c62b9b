//! Recommendation: final confidence, its label, and a closing narrative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::analysis::AnalysisResult;
use crate::extraction::ExtractedDocument;
use crate::llm_client::JudgeHandle;
use crate::matching::JobMatches;
use crate::recommendation::prompts::{recommendation_system, RECOMMENDATION_PROMPT_TEMPLATE};
use crate::scoring::{clamp_percent, round_to, RecommendationWeights};
use crate::screening::ScreeningReport;

pub mod prompts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Self::High
        } else if score >= 60.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Output of the recommendation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalRecommendation {
    pub final_recommendation: String,
    pub confidence_level: ConfidenceLevel,
    pub confidence_score: f64,
    pub recommended_at: DateTime<Utc>,
}

/// `0.4·confidence·100 + 0.4·best match + 0.2·screening`, two decimals.
pub fn final_confidence(
    analysis_confidence: f64,
    best_job_match: f64,
    screening_final_score: f64,
) -> f64 {
    let weights = RecommendationWeights::default();
    let score = weights.analysis_confidence * analysis_confidence * 100.0
        + weights.best_job_match * best_job_match
        + weights.screening * screening_final_score;
    round_to(clamp_percent(score), 2)
}

/// Runs the recommendation stage over everything produced so far. Never fails.
pub async fn recommend(
    extracted: &ExtractedDocument,
    analysis: &AnalysisResult,
    matches: &JobMatches,
    screening: &ScreeningReport,
    judge: &JudgeHandle,
) -> FinalRecommendation {
    let confidence_score = final_confidence(
        analysis.confidence_score,
        matches.best_score() as f64,
        screening.screening_score.final_score,
    );
    let confidence_level = ConfidenceLevel::from_score(confidence_score);
    info!(
        "Final confidence {} ({})",
        confidence_score,
        confidence_level.as_str()
    );

    let context = json!({
        "extracted_data": {
            "raw_text": &extracted.raw_text,
            "contact_info": &extracted.contact_info,
            "structured_data": &extracted.structured_data,
        },
        "analysis_results": analysis,
        "job_matches": matches,
        "screening_results": screening,
    });
    let prompt = RECOMMENDATION_PROMPT_TEMPLATE
        .replace(
            "{context}",
            &serde_json::to_string_pretty(&context).unwrap_or_default(),
        )
        .replace("{confidence_level}", confidence_level.as_str());

    let final_recommendation = match judge.ask(&recommendation_system(), &prompt).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("Recommendation narrative failed: {e}");
            format!("Recommendation narrative unavailable: {e}")
        }
    };

    FinalRecommendation {
        final_recommendation,
        confidence_level,
        confidence_score,
        recommended_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::extraction::ContactInfo;
    use crate::llm_client::testing::ScriptedJudge;
    use crate::models::candidate::CandidateProfile;
    use crate::screening::compute_screening_score;

    fn upstream() -> (ExtractedDocument, AnalysisResult, JobMatches, ScreeningReport) {
        let extracted = ExtractedDocument {
            raw_text: "Ada Lovelace\nAnalyst".to_string(),
            contact_info: ContactInfo {
                name: Some("Ada Lovelace".to_string()),
                ..ContactInfo::default()
            },
            structured_data: json!({}),
        };
        let analysis = AnalysisResult {
            skills_analysis: CandidateProfile::default(),
            confidence_score: 0.5,
            analyzed_at: Utc::now(),
        };
        let matches = JobMatches::default();
        let screening = ScreeningReport {
            screening_score: compute_screening_score(&analysis, &matches),
            screening_summary: "Thin profile.".to_string(),
            screened_at: Utc::now(),
        };
        (extracted, analysis, matches, screening)
    }

    #[test]
    fn test_final_confidence_weights() {
        // 0.4·60 + 0.4·74 + 0.2·71.2 = 24 + 29.6 + 14.24
        assert_eq!(final_confidence(0.6, 74.0, 71.2), 67.84);
        assert_eq!(final_confidence(1.0, 100.0, 100.0), 100.0);
        assert_eq!(final_confidence(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ConfidenceLevel::from_score(85.0), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(84.99), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(60.0), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(59.99), ConfidenceLevel::Low);
    }

    #[test]
    fn test_label_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ConfidenceLevel::Medium).unwrap(),
            r#""medium""#
        );
    }

    #[test]
    fn test_system_prompt_carries_rubric_constraints() {
        let system = recommendation_system();
        assert!(system.contains("NEVER describe or restate the input JSON"));
    }

    #[tokio::test]
    async fn test_narrative_is_requested_over_aggregated_context() {
        let (extracted, analysis, matches, screening) = upstream();
        let judge = Arc::new(ScriptedJudge::new(["  Hold for a junior role.  "]));
        let handle = JudgeHandle::new(judge.clone(), Duration::from_secs(5));

        let result = recommend(&extracted, &analysis, &matches, &screening, &handle).await;

        assert_eq!(result.final_recommendation, "Hold for a junior role.");
        // 0.4·50 + 0.4·0 + 0.2·screening
        let expected = final_confidence(0.5, 0.0, screening.screening_score.final_score);
        assert_eq!(result.confidence_score, expected);
        assert_eq!(result.confidence_level, ConfidenceLevel::Low);

        let prompts = judge.prompts.lock().unwrap();
        assert!(prompts[0].contains("Ada Lovelace"));
        assert!(prompts[0].contains(r"Ada Lovelace\nAnalyst"));
        assert!(prompts[0].contains("Thin profile."));
        assert!(prompts[0].contains("low"));
    }

    #[tokio::test]
    async fn test_judge_failure_keeps_the_numbers() {
        let (extracted, analysis, matches, screening) = upstream();
        let judge = ScriptedJudge::with_results([Err("model offline".to_string())]).handle();

        let result = recommend(&extracted, &analysis, &matches, &screening, &judge).await;

        assert!(result
            .final_recommendation
            .starts_with("Recommendation narrative unavailable"));
        assert!(result.confidence_score > 0.0);
    }
}
