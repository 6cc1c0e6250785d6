// LLM prompt constants for CV import.

/// System prompt for CV import. Enforces JSON-only output.
pub const CV_IMPORT_SYSTEM: &str = "You are an expert CV parser. \
    Convert the text of a CV into structured profile data. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// CV import prompt template. Replace `{rules}` and `{cv_text}` before sending.
pub const CV_IMPORT_PROMPT_TEMPLATE: &str = r#"Extract the profile from the CV text below.

Return a JSON object with this EXACT schema (no extra fields, omit nothing):
{
  "header": {
    "name": "Ada Lovelace",
    "title": "Senior Software Engineer",
    "location": "London, UK",
    "phone": "+44 20 1234 5678",
    "email": "ada@example.com",
    "links": [{"label": "GitHub", "url": "https://github.com/ada"}]
  },
  "summary": "Two or three sentences from the CV's profile section.",
  "experiences": [
    {
      "job_title": "Software Engineer",
      "subtitle": null,
      "company": "ACME GmbH",
      "location": "Berlin",
      "start_date": "2020-01",
      "end_date": "Present",
      "bullets": [{"category": "Backend", "description": "Built Python services ..."}]
    }
  ],
  "education": [
    {"degree": "MSc Computer Science", "institution": "TU Berlin", "location": "Berlin",
     "start_date": "2016", "end_date": "2018", "details": ""}
  ],
  "skill_categories": [
    {"name": "Programming", "skills": [{"name": "Python", "description": "", "keywords": ["Django"]}]}
  ],
  "languages": [{"name": "English", "level": "C2"}],
  "references": []
}

Rules:
- Keep experiences in the order of the CV (most recent first).
- Use "Present" as end_date for ongoing positions.
- Each bullet's category is a 1-2 word label of what the bullet is about.
- Use empty strings or empty arrays for anything the CV does not contain.
- {rules}

CV TEXT:
{cv_text}"#;
