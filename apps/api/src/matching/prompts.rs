// LLM prompt constants for the matching stage.

/// System prompt for per-job semantic comparison.
pub const MATCH_SYSTEM: &str = "You match candidate profiles with job positions. \
    Judge how well the candidate's skills satisfy the job's requirements.";

/// Strict-schema comparison prompt. Replace `{candidate_skills}` and `{job_requirements}`.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"You must output ONE AND ONLY ONE JSON OBJECT.
NEVER output lists, arrays, multiple JSON blocks, code snippets, markdown fences, or explanations.

Your OUTPUT MUST MATCH EXACTLY this schema:
{
  "match_score": <integer between 0 and 100>,
  "reason": "<single-line string>"
}

RULES:
- match_score MUST be an INTEGER between 0 and 100, NOT a float.
- reason MUST be a SINGLE STRING, NOT an array.
- DO NOT include backticks, comments or any text outside the JSON.
- If unsure, guess.

Candidate skills:
{candidate_skills}

Job requirements:
{job_requirements}"#;
