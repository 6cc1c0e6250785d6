// LLM prompt constants for job analysis.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for job analysis. Enforces JSON-only output.
pub const JOB_ANALYSIS_SYSTEM: &str =
    "You are an expert recruiter and applicant-tracking-system analyst. \
    Extract the keywords a CV must contain to pass an ATS for the given job. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Job analysis prompt template. Replace `{job_description}` and `{rules}` before sending.
pub const JOB_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following job description.

Return a JSON object with this EXACT schema (no extra fields):
{
  "jobTitle": "Senior Backend Engineer",
  "companyName": "ACME GmbH",
  "mustHaveKeywords": ["Python", "PostgreSQL"],
  "preferredKeywords": ["Docker", "Kubernetes"],
  "niceToHaveKeywords": ["AWS"],
  "languageRequirement": "english"
}

Rules:
- mustHaveKeywords: skills, tools or qualifications stated as required ("must", "required", "you have").
- preferredKeywords: stated as preferred or strongly desired ("preferred", "ideally", "strong plus").
- niceToHaveKeywords: bonus items ("nice to have", "a plus", "bonus").
- Keywords are short noun phrases as a recruiter would search for them (1-3 words), in the
  spelling used by the posting. At most 15 keywords per list.
- languageRequirement is one of "german", "english", "both" depending on which working
  languages the posting asks for. Use "english" when nothing is said.
- {rules}

JOB DESCRIPTION:
{job_description}"#;
