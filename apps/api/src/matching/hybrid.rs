//! Hybrid match score: semantic judgment + fuzzy string similarity + exact overlap.

use std::collections::BTreeSet;

use similar::TextDiff;

use crate::scoring::{clamp_unit, HybridWeights};

/// Unit-scale sub-scores for one candidate/job pair. Values may arrive out of
/// range; `hybrid_score` clamps each before weighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchComponents {
    pub semantic: f64,
    pub fuzzy: f64,
    pub keyword: f64,
}

/// Case-insensitive character similarity in [0, 1]: 2·matches / total length.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    TextDiff::from_chars(a.as_str(), b.as_str()).ratio() as f64
}

/// Best similarity of each skill against any requirement, summed and divided by
/// the requirement count so long skill lists are not rewarded.
pub fn fuzzy_component(skills: &BTreeSet<String>, requirements: &[String]) -> f64 {
    let total: f64 = skills
        .iter()
        .map(|skill| {
            requirements
                .iter()
                .map(|req| similarity_ratio(skill, req))
                .fold(0.0, f64::max)
        })
        .sum();
    clamp_unit(total / requirements.len().max(1) as f64)
}

/// Exact case-insensitive overlap divided by the number of distinct requirements.
pub fn keyword_component(skills: &BTreeSet<String>, requirements: &[String]) -> f64 {
    let required: BTreeSet<String> = requirements.iter().map(|r| r.to_lowercase()).collect();
    let overlap = required
        .iter()
        .filter(|req| skills.contains(req.as_str()))
        .count();
    clamp_unit(overlap as f64 / required.len().max(1) as f64)
}

/// Unit value as an integer percentage.
pub fn to_percent(unit: f64) -> u8 {
    (clamp_unit(unit) * 100.0).round() as u8
}

/// Weighted score in 0..=100.
pub fn hybrid_score(components: &MatchComponents, weights: &HybridWeights) -> u8 {
    let combined = weights.semantic * clamp_unit(components.semantic)
        + weights.fuzzy * clamp_unit(components.fuzzy)
        + weights.keyword * clamp_unit(components.keyword);
    to_percent(combined)
}
