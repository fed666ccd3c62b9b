use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Seniority bucket used both for the profile and for the job-store level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Junior,
    #[serde(rename = "Mid-level")]
    MidLevel,
    Senior,
}

impl ExperienceLevel {
    /// Substring match on a free-form label: "junior", "mid", "senior".
    /// Anything else is unmapped.
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        if lower.contains("junior") {
            Some(Self::Junior)
        } else if lower.contains("mid") {
            Some(Self::MidLevel)
        } else if lower.contains("senior") {
            Some(Self::Senior)
        } else {
            None
        }
    }

    /// The label stored in the job store's `experience_level` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Junior => "Junior",
            Self::MidLevel => "Mid-level",
            Self::Senior => "Senior",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub field: String,
    pub institution: String,
    pub year: String,
}

/// Candidate profile produced by the analysis stage. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    /// Lowercased and deduplicated.
    pub technical_skills: BTreeSet<String>,
    pub years_of_experience: f64,
    pub education: Vec<Education>,
    /// `None` when the judged label could not be mapped to a bucket.
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub key_achievements: Vec<String>,
    pub domain_expertise: Vec<String>,
}

impl Default for CandidateProfile {
    fn default() -> Self {
        Self {
            technical_skills: BTreeSet::new(),
            years_of_experience: 0.0,
            education: Vec::new(),
            experience_level: Some(ExperienceLevel::Junior),
            key_achievements: Vec::new(),
            domain_expertise: Vec::new(),
        }
    }
}

/// Trims, lowercases and deduplicates skill names. Blank entries are dropped.
pub fn normalize_skills<I, S>(skills: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
