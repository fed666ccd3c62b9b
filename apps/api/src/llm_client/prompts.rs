// Shared prompt fragments. Each stage keeps its own prompts.rs alongside it;
// this file only holds cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps narrative answers on the rubric instead of paraphrasing the input.
pub const NO_RESTATEMENT_INSTRUCTION: &str = "\
    NEVER describe or restate the input JSON. \
    Do not share opinions or reasoning outside the requested format. \
    Be concise and to the point.";
