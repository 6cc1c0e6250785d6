// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to extraction prompts so the model never fills gaps with guesses.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Only use information that is present in the input text. \
    If a field is not mentioned, return an empty string or an empty list for it. \
    Never invent employers, dates, skills or keywords.";
