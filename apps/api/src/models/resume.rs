//! Structured resume data — the root aggregate produced by extraction and
//! replaced wholesale by each successful revision.
//!
//! Wire format is camelCase to match the JSON schema the extraction prompt
//! pins down. Every field defaults, so a merely incomplete object still
//! deserializes; defaulting to empty ("unknown") is the contract — never null.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub location: String,
    pub summary: String,
}

/// One job. `description` is ordered bullets; order is meaningful.
/// Dates are free text ("Jan 2020", "Present") — never parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub id: String,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub description: Vec<String>,
    pub key_tech: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationEntry {
    pub id: String,
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub grad_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Certification {
    pub id: String,
    pub name: String,
}

/// `years` is non-negative; 0 means "unspecified".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub years: u32,
}

/// `link` is a bare domain/path — a scheme is not guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub link: String,
}

/// The root aggregate. Child identifiers are assigned once at creation and
/// never reassigned by any revision operation.
///
/// `key_architectural_projects` is semantically distinct from `projects` and
/// the two are never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<Certification>,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
    pub key_architectural_projects: Vec<Project>,
}
