// Prompt constants for the content-revision call.

use crate::errors::AppError;
use crate::llm::prompts::JSON_ONLY_RULES;
use crate::models::resume::ResumeDocument;

/// Revision prompt. Edits are scoped to prose (summary, bullet phrasing);
/// structural changes are forbidden outright — the loss guard downstream is
/// the enforcement, this is the instruction.
const REVISION_PROMPT_TEMPLATE: &str = r#"You are an expert resume writer. Improve this resume data based on the requested improvements.

CURRENT RESUME DATA:
{document_json}

REQUESTED IMPROVEMENTS:
{instruction}

INSTRUCTIONS:
1. Focus on improving the professional summary (personalInfo.summary) and experience descriptions
2. Make experience bullet points more impactful with action verbs and quantifiable results
3. Keep the exact same JSON structure - do not change field names or types
4. Preserve all id values exactly as they are
5. Do NOT add, remove, rename, or reorder sections or entries
6. description must remain an array of strings
7. Return the COMPLETE resume object, every section included

{json_only_rules}"#;

/// Builds the revision prompt around the pre-revision snapshot.
pub fn build_revision_prompt(
    document: &ResumeDocument,
    instruction: &str,
) -> Result<String, AppError> {
    let document_json = serde_json::to_string_pretty(document)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize document: {e}")))?;

    Ok(REVISION_PROMPT_TEMPLATE
        .replace("{document_json}", &document_json)
        .replace("{instruction}", instruction)
        .replace("{json_only_rules}", JSON_ONLY_RULES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_document_and_instruction() {
        let document = ResumeDocument {
            personal_info: crate::models::resume::PersonalInfo {
                name: "Jane Doe".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let prompt = build_revision_prompt(&document, "improve summary").unwrap();
        assert!(prompt.contains("Jane Doe"));
        assert!(prompt.contains("improve summary"));
        assert!(prompt.contains("Preserve all id values"));
    }
}
