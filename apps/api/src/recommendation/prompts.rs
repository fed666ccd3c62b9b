// LLM prompt constants for the recommendation stage.

use crate::llm_client::prompts::NO_RESTATEMENT_INSTRUCTION;

/// Rubric for the closing narrative. Built once per call from the shared fragment.
pub fn recommendation_system() -> String {
    format!(
        "Generate final hiring recommendations considering: \
        1. the extracted profile, 2. the skills analysis, 3. the job matches, \
        4. the screening results. Provide clear next steps and specific recommendations. \
        HARD CONSTRAINTS: {NO_RESTATEMENT_INSTRUCTION} Act only as a recommender and give feedback."
    )
}

/// Replace `{context}` and `{confidence_level}` before sending.
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"Aggregated candidate context:
{context}

The computed confidence level is {confidence_level}. Give the recommendation and next steps."#;
