// Prompt constants for style generation.

use crate::errors::AppError;
use crate::llm::prompts::JSON_ONLY_RULES;
use crate::models::resume::ResumeDocument;
use crate::models::styles::StyleOverrides;

/// Style prompt. The model must return the complete slot mapping, replacing
/// only classes that conflict with the instruction; the shallow merge
/// downstream covers slots it omits anyway.
const STYLE_PROMPT_TEMPLATE: &str = r#"Generate Tailwind CSS class names for a resume based on these preferences: {instruction}

The resume currently uses these style classes:
{current_styles_json}

The resume content, for context on what is being styled:
{document_json}

Return ONLY valid JSON with this structure (every slot is optional, but
include ALL slots you are not changing with their current value):
{
  "container": "tailwind classes",
  "header": "tailwind classes",
  "name": "tailwind classes",
  "contactInfo": "tailwind classes",
  "summary": "tailwind classes",
  "section": "tailwind classes",
  "sectionTitle": "tailwind classes",
  "itemHeader": "tailwind classes",
  "itemTitle": "tailwind classes",
  "itemSubtitle": "tailwind classes",
  "itemDate": "tailwind classes",
  "itemList": "tailwind classes",
  "listItem": "tailwind classes",
  "skillsList": "tailwind classes",
  "skillItem": "tailwind classes"
}

Only replace classes that conflict with the requested preferences. Keep
unrelated slots exactly as they are.

{json_only_rules}"#;

pub fn build_style_prompt(
    document: &ResumeDocument,
    current: &StyleOverrides,
    instruction: &str,
) -> Result<String, AppError> {
    let current_styles_json = serde_json::to_string_pretty(current)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize styles: {e}")))?;
    let document_json = serde_json::to_string_pretty(document)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize document: {e}")))?;

    Ok(STYLE_PROMPT_TEMPLATE
        .replace("{instruction}", instruction)
        .replace("{current_styles_json}", &current_styles_json)
        .replace("{document_json}", &document_json)
        .replace("{json_only_rules}", JSON_ONLY_RULES))
}
