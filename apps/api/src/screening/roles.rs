//! Static role table for coverage scoring.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;

use crate::scoring::round_to;

/// Score for roles missing from the table.
pub const NEUTRAL_ROLE_SCORE: f64 = 60.0;

const MUST_WEIGHT: f64 = 70.0;
const GOOD_WEIGHT: f64 = 30.0;

/// Must-have and nice-to-have skills for one role.
#[derive(Debug, Clone)]
pub struct RoleSkills {
    pub must: &'static [&'static str],
    pub good: &'static [&'static str],
}

/// Lowercase role name → skill tiers. Extend by adding entries.
pub static ROLE_TABLE: Lazy<HashMap<&'static str, RoleSkills>> = Lazy::new(|| {
    HashMap::from([
        (
            "robotics",
            RoleSkills {
                must: &["c++", "ros", "ros2", "linux", "opencv", "robotics", "slam"],
                good: &["pytorch", "kalman", "ekf", "pid", "motion planning"],
            },
        ),
        (
            "machine learning",
            RoleSkills {
                must: &["python", "pytorch", "tensorflow", "machine learning"],
                good: &["huggingface", "mlops", "docker", "aws"],
            },
        ),
        (
            "cv engineer",
            RoleSkills {
                must: &["opencv", "pytorch", "computer vision", "image processing"],
                good: &["yolo", "segmentation", "detection"],
            },
        ),
        (
            "nlp",
            RoleSkills {
                must: &["nlp", "transformers", "huggingface", "python"],
                good: &["lora", "openai api"],
            },
        ),
        (
            "backend",
            RoleSkills {
                must: &["python", "sql", "docker", "rest", "apis"],
                good: &["aws", "redis", "kafka"],
            },
        ),
        (
            "embedded",
            RoleSkills {
                must: &["c", "c++", "embedded", "linux", "microcontroller"],
                good: &["uart", "spi", "i2c", "rtos"],
            },
        ),
        (
            "devops",
            RoleSkills {
                must: &["docker", "kubernetes", "linux", "ci/cd"],
                good: &["aws", "terraform"],
            },
        ),
    ])
});

/// Coverage score in [0, 100] for a known role, `NEUTRAL_ROLE_SCORE` otherwise.
///
/// Nice-to-have hits are divided by the must-have list length, not the
/// nice-to-have length.
pub fn role_specific_score(role: &str, skills: &BTreeSet<String>) -> f64 {
    let key = role.trim().to_lowercase();
    let Some(tiers) = ROLE_TABLE.get(key.as_str()) else {
        return NEUTRAL_ROLE_SCORE;
    };

    let must_hits = tiers.must.iter().filter(|m| skills.contains(**m)).count();
    let good_hits = tiers.good.iter().filter(|g| skills.contains(**g)).count();
    let must_len = tiers.must.len() as f64;

    let must_score = must_hits as f64 / must_len * MUST_WEIGHT;
    let good_score = good_hits as f64 / must_len * GOOD_WEIGHT;

    round_to(must_score + good_score, 2)
}
