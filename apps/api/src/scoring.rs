//! Weights and numeric helpers shared by every scoring stage.

use serde::{Deserialize, Serialize};

/// Hybrid match weights: semantic judgment dominates, string heuristics refine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridWeights {
    pub semantic: f64,
    pub fuzzy: f64,
    pub keyword: f64,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            semantic: 0.80,
            fuzzy: 0.10,
            keyword: 0.10,
        }
    }
}

/// Screening weights. Inputs are all on a 0–100 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningWeights {
    pub best_job_match: f64,
    pub analyzer_confidence: f64,
    pub education: f64,
    pub experience: f64,
    pub role: f64,
}

impl Default for ScreeningWeights {
    fn default() -> Self {
        Self {
            best_job_match: 0.30,
            analyzer_confidence: 0.25,
            education: 0.15,
            experience: 0.10,
            role: 0.20,
        }
    }
}

/// Final recommendation weights. Inputs are all on a 0–100 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationWeights {
    pub analysis_confidence: f64,
    pub best_job_match: f64,
    pub screening: f64,
}

impl Default for RecommendationWeights {
    fn default() -> Self {
        Self {
            analysis_confidence: 0.4,
            best_job_match: 0.4,
            screening: 0.2,
        }
    }
}

/// Clamps into [0, 1]. NaN collapses to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Clamps into [0, 100]. NaN collapses to 0.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Rounds to `places` decimals; exact halves go to the even neighbour.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round_ties_even() / factor
}
