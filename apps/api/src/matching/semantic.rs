use std::collections::BTreeSet;

use serde_json::Value;
use tracing::warn;

use crate::llm_client::json::extract_json_block;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::JudgeHandle;
use crate::matching::prompts::{MATCH_PROMPT_TEMPLATE, MATCH_SYSTEM};

/// The judge's raw 0–100 score and its one-line rationale.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticVerdict {
    pub score: f64,
    pub rationale: String,
}

impl SemanticVerdict {
    fn zero(rationale: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            rationale: rationale.into(),
        }
    }
}

/// Asks the judge to compare skills against requirements. Judge failures and
/// timeouts score 0 with the error as rationale.
pub async fn judge_match(
    judge: &JudgeHandle,
    skills: &BTreeSet<String>,
    requirements: &[String],
) -> SemanticVerdict {
    let skills_json = serde_json::to_string(skills).unwrap_or_default();
    let requirements_json = serde_json::to_string(requirements).unwrap_or_default();
    let prompt = MATCH_PROMPT_TEMPLATE
        .replace("{candidate_skills}", &skills_json)
        .replace("{job_requirements}", &requirements_json);

    let system = format!("{MATCH_SYSTEM} {JSON_ONLY_SYSTEM}");
    match judge.ask(&system, &prompt).await {
        Ok(text) => parse_verdict(&text),
        Err(e) => {
            warn!("Semantic match judgment failed: {e}");
            SemanticVerdict::zero(format!("Semantic judgment unavailable: {e}"))
        }
    }
}

/// Reads `{match_score, reason}` from noisy output. An array contributes its first
/// element; anything unusable scores 0 with a short explanation.
pub fn parse_verdict(text: &str) -> SemanticVerdict {
    let value = match extract_json_block(text) {
        Ok(value) => value,
        Err(_) => return SemanticVerdict::zero("No JSON found"),
    };

    let object = match value {
        Value::Array(items) => match items.into_iter().next() {
            None => return SemanticVerdict::zero("Empty JSON list"),
            Some(Value::String(s)) => return SemanticVerdict::zero(s),
            Some(Value::Object(o)) => o,
            Some(_) => return SemanticVerdict::zero("Malformed JSON"),
        },
        Value::Object(o) => o,
        _ => return SemanticVerdict::zero("Malformed JSON"),
    };

    let score = match object.get("match_score") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    let rationale = match object.get("reason") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .map(|p| match p {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ => "No explanation".to_string(),
    };

    SemanticVerdict { score, rationale }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_verdict() {
        let verdict = parse_verdict(r#"{"match_score": 85, "reason": "Strong Python overlap"}"#);
        assert_eq!(verdict.score, 85.0);
        assert_eq!(verdict.rationale, "Strong Python overlap");
    }

    #[test]
    fn test_first_element_of_array() {
        let verdict = parse_verdict(
            r#"[{"match_score": 60, "reason": "ok"}, {"match_score": 10, "reason": "bad"}]"#,
        );
        assert_eq!(verdict.score, 60.0);
    }

    #[test]
    fn test_fenced_with_prose() {
        let verdict = parse_verdict("Result:\n```json\n{\"match_score\": \"72\", \"reason\": \"fine\"}\n```");
        assert_eq!(verdict.score, 72.0);
    }

    #[test]
    fn test_bracketed_reference_before_object() {
        let verdict = parse_verdict(r#"Per requirement [1]: {"match_score": 85, "reason": "strong"}"#);
        assert_eq!(verdict.score, 85.0);
        assert_eq!(verdict.rationale, "strong");
    }

    #[test]
    fn test_reason_list_is_joined() {
        let verdict = parse_verdict(r#"{"match_score": 50, "reason": ["has sql", "lacks docker"]}"#);
        assert_eq!(verdict.rationale, "has sql; lacks docker");
    }

    #[test]
    fn test_failure_modes_score_zero() {
        assert_eq!(parse_verdict("no idea"), SemanticVerdict::zero("No JSON found"));
        assert_eq!(parse_verdict("{\"match_score\": 9"), SemanticVerdict::zero("No JSON found"));
        assert_eq!(parse_verdict("[]"), SemanticVerdict::zero("Empty JSON list"));
        assert_eq!(parse_verdict("[42]"), SemanticVerdict::zero("Malformed JSON"));
        assert_eq!(parse_verdict(r#"["just text"]"#), SemanticVerdict::zero("just text"));
    }

    #[test]
    fn test_missing_fields_default() {
        let verdict = parse_verdict(r#"{"score": 90}"#);
        assert_eq!(verdict.score, 0.0);
        assert_eq!(verdict.rationale, "No explanation");
    }
}
