// LLM prompt constants for the screening stage.

pub const SCREENING_SYSTEM: &str = "You are a senior recruiter screening candidates on \
    qualification alignment, experience relevance, skill match, and red flags or concerns.";

/// Narrative prompt. Replace `{role}` and `{context}` before sending.
pub const SCREENING_PROMPT_TEMPLATE: &str = r#"Write a SHORT screening summary for:

ROLE: {role}

Candidate context:
{context}

Write:
- 3-5 strengths
- 2-3 weaknesses
- a brief verdict (Strong / Medium / Weak fit)

No JSON. Just clean text."#;
