//! The normalization boundary between raw model JSON and the typed document.
//!
//! All tolerance for model sloppiness lives here: missing fields default,
//! a bare string where a bullet array belongs is coerced, fractional or
//! negative skill years are clamped. Identifiers are assigned locally in
//! document order — the model cannot be trusted to keep them unique or
//! stable, so any ids it returns are discarded.

use serde::Deserialize;

use crate::models::resume::{
    Certification, EducationEntry, ExperienceEntry, PersonalInfo, Project, ResumeDocument, Skill,
};

/// Model output in the shape the extraction prompt requests. Every field
/// defaults, so an incomplete-but-valid object parses; only unparseable JSON
/// is an error, and that is decided by the caller before this type is used.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParsedResume {
    personal_info: PersonalInfo,
    experience: Vec<ParsedExperience>,
    education: Vec<ParsedEducation>,
    certifications: Vec<ParsedCertification>,
    skills: Vec<ParsedSkill>,
    projects: Vec<ParsedProject>,
    key_architectural_projects: Vec<ParsedProject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ParsedExperience {
    job_title: String,
    company: String,
    location: String,
    start_date: String,
    end_date: String,
    description: Option<Bullets>,
    key_tech: String,
}

/// The model sometimes returns a lone bullet as a bare string instead of a
/// one-element array. Coerced here and nowhere else.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Bullets {
    Many(Vec<String>),
    One(String),
}

impl Bullets {
    fn into_vec(self) -> Vec<String> {
        match self {
            Bullets::Many(bullets) => bullets,
            Bullets::One(bullet) if bullet.is_empty() => Vec::new(),
            Bullets::One(bullet) => vec![bullet],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ParsedEducation {
    degree: String,
    institution: String,
    location: String,
    grad_date: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ParsedCertification {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ParsedSkill {
    name: String,
    /// Accepted as a float because models occasionally return "2.5 years".
    years: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ParsedProject {
    name: String,
    description: String,
    link: String,
}

/// Builds the typed document, assigning fresh stable identifiers to every
/// array item in document order (`exp-1`, `exp-2`, ...).
pub fn normalize(parsed: ParsedResume) -> ResumeDocument {
    ResumeDocument {
        personal_info: parsed.personal_info,
        experience: parsed
            .experience
            .into_iter()
            .enumerate()
            .map(|(idx, exp)| ExperienceEntry {
                id: item_id("exp", idx),
                job_title: exp.job_title,
                company: exp.company,
                location: exp.location,
                start_date: exp.start_date,
                end_date: exp.end_date,
                description: exp.description.map(Bullets::into_vec).unwrap_or_default(),
                key_tech: exp.key_tech,
            })
            .collect(),
        education: parsed
            .education
            .into_iter()
            .enumerate()
            .map(|(idx, edu)| EducationEntry {
                id: item_id("edu", idx),
                degree: edu.degree,
                institution: edu.institution,
                location: edu.location,
                grad_date: edu.grad_date,
            })
            .collect(),
        certifications: parsed
            .certifications
            .into_iter()
            .enumerate()
            .map(|(idx, cert)| Certification {
                id: item_id("cert", idx),
                name: cert.name,
            })
            .collect(),
        skills: parsed
            .skills
            .into_iter()
            .enumerate()
            .map(|(idx, skill)| Skill {
                id: item_id("skill", idx),
                name: skill.name,
                years: clamp_years(skill.years),
            })
            .collect(),
        projects: normalize_projects(parsed.projects, "proj"),
        key_architectural_projects: normalize_projects(parsed.key_architectural_projects, "arch-proj"),
    }
}

fn normalize_projects(projects: Vec<ParsedProject>, prefix: &str) -> Vec<Project> {
    projects
        .into_iter()
        .enumerate()
        .map(|(idx, proj)| Project {
            id: item_id(prefix, idx),
            name: proj.name,
            description: proj.description,
            link: proj.link,
        })
        .collect()
}

/// Identifiers are 1-based in source order, per list.
pub fn item_id(prefix: &str, index: usize) -> String {
    format!("{}-{}", prefix, index + 1)
}

fn clamp_years(years: f64) -> u32 {
    if years.is_finite() && years > 0.0 {
        years.round() as u32
    } else {
        0
    }
}
