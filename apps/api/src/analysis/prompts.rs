// LLM prompt constants for the analysis stage.

/// System prompt for profile extraction.
pub const ANALYSIS_SYSTEM: &str = "You analyze candidate profiles and extract: \
    technical skills (as a list), years of experience (numeric), education, \
    experience level (Junior/Mid-level/Senior), key achievements and domain expertise.";

/// Profile extraction prompt. Replace `{structured_data}` and `{raw_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"From the following structured resume data AND the raw resume text, extract a
COMPLETE list of ALL technical skills, tools, libraries, frameworks, programming
languages, ML/CV/AI techniques, robotics skills, embedded systems skills, cloud
skills, DevOps technologies and domain keywords.

Scan the entire resume: skills section, work experience, projects, research,
summary, links and tools mentioned anywhere in the text.

Return a JSON object with this EXACT schema:
{
  "technical_skills": ["python", "c++", "ros2", "pytorch"],
  "years_of_experience": 0,
  "education": [
    {"degree": "Bachelors/Masters/PhD", "field": "", "institution": "", "year": ""}
  ],
  "experience_level": "Junior/Mid-level/Senior",
  "key_achievements": [],
  "domain_expertise": ["robotics", "computer vision"]
}

Rules:
- Normalize all skill names to lowercase.
- Deduplicate keywords; include synonyms only once.
- Keep only true skills or technologies (no soft skills such as communication).
- Extract skills even if mentioned briefly inside experience descriptions.

Resume structured data:
{structured_data}

Raw resume text:
{raw_text}

Return ONLY the JSON object. No explanation."#;
