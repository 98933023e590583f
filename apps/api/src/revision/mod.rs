//! AI content revision with loss-guarding.
//!
//! Revision is the one place data loss is a first-class risk: the model is
//! asked to rewrite prose and must not be allowed to drop sections. Two
//! defenses stack up:
//!
//! 1. Fail soft — any transport or parse failure returns the pre-revision
//!    snapshot unchanged. Losing a user's resume to a failed enhancement is
//!    strictly worse than a no-op.
//! 2. Field-level guard — a returned empty scalar falls back to the snapshot
//!    value, and a returned empty list restores the snapshot's entire list.
//!    The list guard is per-field and all-or-nothing, not an item merge.
//!
//! Identifiers are never sourced from the model: they are restored from the
//! snapshot positionally after the guard runs.

pub mod handlers;
pub mod prompts;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::normalize::{self, item_id, ParsedResume};
use crate::llm::retry::RetryPolicy;
use crate::llm::{first_json_object, Dispatcher, ResponseFormat};
use crate::models::resume::ResumeDocument;
use crate::providers::registry::ProviderRegistry;

/// Result of a revision call. `revised` is false when the pipeline failed and
/// the document is the untouched snapshot, so the UI can tell the user the
/// content was not changed.
#[derive(Debug)]
pub struct RevisionOutcome {
    pub document: ResumeDocument,
    pub revised: bool,
}

/// Rewrites document prose per `instruction`, guaranteeing no populated field
/// or section comes back empty. Never fails: errors degrade to the snapshot.
pub async fn revise_content(
    current: &ResumeDocument,
    instruction: &str,
    registry: &ProviderRegistry,
    dispatcher: &Dispatcher,
) -> RevisionOutcome {
    match request_revision(current, instruction, registry, dispatcher).await {
        Ok(candidate) => RevisionOutcome {
            document: guard_against_loss(current, candidate),
            revised: true,
        },
        Err(e) => {
            warn!("content revision failed; returning document unchanged: {e}");
            RevisionOutcome {
                document: current.clone(),
                revised: false,
            }
        }
    }
}

async fn request_revision(
    current: &ResumeDocument,
    instruction: &str,
    registry: &ProviderRegistry,
    dispatcher: &Dispatcher,
) -> Result<ResumeDocument, AppError> {
    let selection = registry.active().await;
    info!(
        "revising resume content via '{}' model '{}'",
        selection.provider.id(),
        selection.model
    );

    let prompt = prompts::build_revision_prompt(current, instruction)?;
    let raw = dispatcher
        .dispatch(
            selection.provider,
            &selection.model,
            &prompt,
            ResponseFormat::JsonObject,
            &RetryPolicy::none(),
        )
        .await
        .map_err(|e| AppError::Provider {
            provider: selection.provider.id().to_string(),
            message: e.to_string(),
        })?;

    let object = first_json_object(&raw).ok_or_else(|| {
        AppError::MalformedResponse("no JSON object found in model output".to_string())
    })?;
    let parsed: ParsedResume =
        serde_json::from_str(object).map_err(|e| AppError::MalformedResponse(e.to_string()))?;

    Ok(normalize::normalize(parsed))
}

/// Merges a revision candidate against the pre-revision snapshot so nothing
/// previously populated becomes empty.
fn guard_against_loss(snapshot: &ResumeDocument, mut candidate: ResumeDocument) -> ResumeDocument {
    {
        let prior = &snapshot.personal_info;
        let info = &mut candidate.personal_info;
        fallback_scalar(&mut info.name, &prior.name);
        fallback_scalar(&mut info.email, &prior.email);
        fallback_scalar(&mut info.phone, &prior.phone);
        fallback_scalar(&mut info.website, &prior.website);
        fallback_scalar(&mut info.location, &prior.location);
        fallback_scalar(&mut info.summary, &prior.summary);
    }

    restore_list(&mut candidate.experience, &snapshot.experience);
    restore_list(&mut candidate.education, &snapshot.education);
    restore_list(&mut candidate.certifications, &snapshot.certifications);
    restore_list(&mut candidate.skills, &snapshot.skills);
    restore_list(&mut candidate.projects, &snapshot.projects);
    restore_list(
        &mut candidate.key_architectural_projects,
        &snapshot.key_architectural_projects,
    );

    restore_identifiers(snapshot, &mut candidate);
    candidate
}

fn fallback_scalar(field: &mut String, prior: &str) {
    if field.trim().is_empty() && !prior.is_empty() {
        *field = prior.to_string();
    }
}

fn restore_list<T: Clone>(candidate: &mut Vec<T>, snapshot: &[T]) {
    if candidate.is_empty() && !snapshot.is_empty() {
        *candidate = snapshot.to_vec();
    }
}

/// Identifiers stay what extraction assigned: each kept entry takes the id of
/// the snapshot entry at its position; entries beyond the snapshot (the model
/// was told not to add any) get continuing deterministic ids.
fn restore_identifiers(snapshot: &ResumeDocument, candidate: &mut ResumeDocument) {
    for (i, entry) in candidate.experience.iter_mut().enumerate() {
        entry.id = snapshot
            .experience
            .get(i)
            .map_or_else(|| item_id("exp", i), |s| s.id.clone());
    }
    for (i, entry) in candidate.education.iter_mut().enumerate() {
        entry.id = snapshot
            .education
            .get(i)
            .map_or_else(|| item_id("edu", i), |s| s.id.clone());
    }
    for (i, entry) in candidate.certifications.iter_mut().enumerate() {
        entry.id = snapshot
            .certifications
            .get(i)
            .map_or_else(|| item_id("cert", i), |s| s.id.clone());
    }
    for (i, entry) in candidate.skills.iter_mut().enumerate() {
        entry.id = snapshot
            .skills
            .get(i)
            .map_or_else(|| item_id("skill", i), |s| s.id.clone());
    }
    for (i, entry) in candidate.projects.iter_mut().enumerate() {
        entry.id = snapshot
            .projects
            .get(i)
            .map_or_else(|| item_id("proj", i), |s| s.id.clone());
    }
    for (i, entry) in candidate.key_architectural_projects.iter_mut().enumerate() {
        entry.id = snapshot
            .key_architectural_projects
            .get(i)
            .map_or_else(|| item_id("arch-proj", i), |s| s.id.clone());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{Config, ProviderSettings};
    use crate::models::resume::{ExperienceEntry, PersonalInfo, Skill};
    use crate::providers::selection::MemorySelectionStore;
    use crate::providers::ProviderCatalog;

    fn sample_document() -> ResumeDocument {
        ResumeDocument {
            personal_info: PersonalInfo {
                name: "Jane Doe".to_string(),
                email: "jane@x.com".to_string(),
                phone: "+1 555 0100".to_string(),
                website: "janedoe.dev".to_string(),
                location: "Berlin".to_string(),
                summary: "Engineer with ten years of experience.".to_string(),
            },
            experience: vec![ExperienceEntry {
                id: "exp-1".to_string(),
                job_title: "Engineer".to_string(),
                company: "Acme".to_string(),
                description: vec!["Built X".to_string(), "Built Y".to_string()],
                ..Default::default()
            }],
            skills: (1..=5)
                .map(|i| Skill {
                    id: format!("skill-{i}"),
                    name: format!("Skill {i}"),
                    years: i,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_emptied_list_is_restored_wholesale() {
        let snapshot = sample_document();
        let mut candidate = snapshot.clone();
        candidate.skills.clear();

        let guarded = guard_against_loss(&snapshot, candidate);
        assert_eq!(guarded.skills, snapshot.skills);
        assert_eq!(guarded.skills.len(), 5);
    }

    #[test]
    fn test_empty_scalars_fall_back_to_snapshot() {
        let snapshot = sample_document();
        let mut candidate = snapshot.clone();
        candidate.personal_info.name = String::new();
        candidate.personal_info.phone = "   ".to_string();
        candidate.personal_info.summary = "A sharper summary.".to_string();

        let guarded = guard_against_loss(&snapshot, candidate);
        assert_eq!(guarded.personal_info.name, "Jane Doe");
        assert_eq!(guarded.personal_info.phone, "+1 555 0100");
        // A genuinely revised scalar is kept.
        assert_eq!(guarded.personal_info.summary, "A sharper summary.");
    }

    #[test]
    fn test_rewritten_entries_keep_snapshot_identifiers() {
        let snapshot = sample_document();
        let mut candidate = snapshot.clone();
        candidate.experience[0].id = "exp-99".to_string();
        candidate.experience[0].description = vec!["Delivered X at scale".to_string()];

        let guarded = guard_against_loss(&snapshot, candidate);
        assert_eq!(guarded.experience[0].id, "exp-1");
        assert_eq!(
            guarded.experience[0].description,
            vec!["Delivered X at scale"]
        );
    }

    #[test]
    fn test_unchanged_candidate_is_valid_and_untouched() {
        let snapshot = sample_document();
        let guarded = guard_against_loss(&snapshot, snapshot.clone());
        assert_eq!(guarded, snapshot);
    }

    #[test]
    fn test_extra_entries_get_continuing_ids() {
        let snapshot = sample_document();
        let mut candidate = snapshot.clone();
        candidate.experience.push(ExperienceEntry {
            id: "invented-by-model".to_string(),
            company: "Globex".to_string(),
            ..Default::default()
        });

        let guarded = guard_against_loss(&snapshot, candidate);
        assert_eq!(guarded.experience[1].id, "exp-2");
    }

    // ── pipeline-level tests ────────────────────────────────────────────────

    fn openai_test_stack(base_url: String) -> (ProviderRegistry, Dispatcher) {
        let config = Config {
            gemini: None,
            openai: Some(ProviderSettings {
                api_key: "test-key".to_string(),
                base_url,
                models: vec!["gpt-4o".to_string()],
            }),
            ollama_local: None,
            ollama_cloud: None,
            default_provider: None,
            selection_path: "provider_selection.json".into(),
            port: 8080,
            rust_log: "info".to_string(),
        };
        let catalog = ProviderCatalog::from_config(&config).unwrap();
        let registry =
            ProviderRegistry::new(catalog, None, Arc::new(MemorySelectionStore::new(None)));
        (registry, Dispatcher::new(config))
    }

    #[tokio::test]
    async fn test_transport_failure_returns_snapshot_unrevised() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let snapshot = sample_document();
        let (registry, dispatcher) = openai_test_stack(server.url());
        let outcome = revise_content(&snapshot, "improve summary", &registry, &dispatcher).await;

        assert!(!outcome.revised);
        assert_eq!(outcome.document, snapshot);
    }

    #[tokio::test]
    async fn test_model_dropping_skills_does_not_lose_them() {
        let mut server = mockito::Server::new_async().await;
        // Model "improves" the summary but incorrectly returns skills: [].
        let content = serde_json::json!({
            "personalInfo": {
                "name": "Jane Doe",
                "email": "jane@x.com",
                "phone": "+1 555 0100",
                "website": "janedoe.dev",
                "location": "Berlin",
                "summary": "Seasoned engineer delivering measurable impact."
            },
            "experience": [{
                "id": "exp-1",
                "jobTitle": "Engineer",
                "company": "Acme",
                "description": ["Shipped X to 1M users", "Cut Y latency 40%"]
            }],
            "skills": []
        })
        .to_string();
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(
                serde_json::json!({"choices":[{"message":{"content": content}}]}).to_string(),
            )
            .create_async()
            .await;

        let snapshot = sample_document();
        let (registry, dispatcher) = openai_test_stack(server.url());
        let outcome = revise_content(&snapshot, "improve summary", &registry, &dispatcher).await;

        assert!(outcome.revised);
        assert_eq!(
            outcome.document.personal_info.summary,
            "Seasoned engineer delivering measurable impact."
        );
        assert_eq!(outcome.document.skills, snapshot.skills);
        assert_eq!(outcome.document.experience[0].id, "exp-1");
    }
}
