// Cross-cutting prompt fragments. Each pipeline stage defines its own
// prompts.rs alongside it and splices these in.

/// Output rules appended to every prompt that expects a JSON reply. The
/// raw-generate transports have no native JSON mode, so the instruction is
/// the only enforcement there; brace extraction downstream covers the rest.
pub const JSON_ONLY_RULES: &str = "\
OUTPUT RULES:
- Respond with ONE valid JSON object and nothing else.
- Do NOT include any text outside the JSON object.
- Do NOT use markdown code fences.
- Do NOT include explanations or apologies.";
