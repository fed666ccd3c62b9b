//! Candidate profile parsing and analysis confidence.
//!
//! The judge's profile JSON is read field by field: a missing or mistyped field
//! takes its default instead of failing the whole profile.

use serde_json::{Map, Value};

use crate::llm_client::json::{extract_json_block, ParseError};
use crate::models::candidate::{normalize_skills, CandidateProfile, Education, ExperienceLevel};
use crate::scoring::round_to;

const DEGREE_KEYWORDS: &[&str] = &["bachelor", "bachelor's", "master", "master's", "phd", "doctor"];
const FIELD_PLACEHOLDERS: &[&str] = &["", "unknown", "n/a", "none", "null"];

/// Builds a profile from judge output. Years are left at 0; the caller overrides them.
pub fn parse_profile(text: &str) -> Result<CandidateProfile, ParseError> {
    let value = match extract_json_block(text)? {
        Value::Array(items) => items.into_iter().next().ok_or(ParseError::NoJson)?,
        other => other,
    };
    let Value::Object(fields) = value else {
        return Err(ParseError::Malformed);
    };

    Ok(CandidateProfile {
        technical_skills: normalize_skills(string_list(fields.get("technical_skills"))),
        years_of_experience: 0.0,
        education: education_list(fields.get("education")),
        experience_level: experience_level(fields.get("experience_level")),
        key_achievements: string_list(fields.get("key_achievements")),
        domain_expertise: string_list(fields.get("domain_expertise")),
    })
}

/// Accepts a JSON array of strings or a single comma-separated string.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(joined)) => joined
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Accepts a list of entries or a single entry object.
fn education_list(value: Option<&Value>) -> Vec<Education> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(education_entry)
            .collect(),
        Some(Value::Object(entry)) => vec![education_entry(entry)],
        _ => Vec::new(),
    }
}

fn education_entry(entry: &Map<String, Value>) -> Education {
    let degree = text_field(entry, "degree");
    Education {
        degree: if degree.is_empty() {
            text_field(entry, "level")
        } else {
            degree
        },
        field: text_field(entry, "field"),
        institution: text_field(entry, "institution"),
        year: text_field(entry, "year"),
    }
}

/// Strings pass through, numbers are rendered, anything else is empty.
fn text_field(entry: &Map<String, Value>, key: &str) -> String {
    match entry.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// A missing label means Mid-level; an unrecognised one stays unmapped.
fn experience_level(value: Option<&Value>) -> Option<ExperienceLevel> {
    match value {
        None | Some(Value::Null) => Some(ExperienceLevel::MidLevel),
        Some(Value::String(label)) => ExperienceLevel::from_label(label),
        Some(_) => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Confidence
// ────────────────────────────────────────────────────────────────────────────

pub fn skills_score(skill_count: usize) -> f64 {
    match skill_count {
        0 => 0.2,
        1..=4 => 0.6,
        _ => 1.0,
    }
}

pub fn experience_score(years: f64) -> f64 {
    if years > 0.0 {
        1.0
    } else {
        0.3
    }
}

/// 1.0 when every entry names a recognised degree and a real field, 0.5 when any
/// entry satisfies either check, 0.2 otherwise (including no entries at all).
pub fn education_score(education: &[Education]) -> f64 {
    if education.is_empty() {
        return 0.2;
    }

    let checks: Vec<(bool, bool)> = education
        .iter()
        .map(|entry| {
            let degree = entry.degree.to_lowercase();
            let level_ok = DEGREE_KEYWORDS.iter().any(|k| degree.contains(k));
            let field = entry.field.trim().to_lowercase();
            let field_ok = !FIELD_PLACEHOLDERS.contains(&field.as_str());
            (level_ok, field_ok)
        })
        .collect();

    if checks.iter().all(|(level, field)| *level && *field) {
        1.0
    } else if checks.iter().any(|(level, field)| *level || *field) {
        0.5
    } else {
        0.2
    }
}

/// Unweighted mean of the three sub-scores, rounded to two decimals.
pub fn analysis_confidence(profile: &CandidateProfile) -> f64 {
    let mean = (skills_score(profile.technical_skills.len())
        + experience_score(profile.years_of_experience)
        + education_score(&profile.education))
        / 3.0;
    round_to(mean, 2)
}
