#![allow(dead_code)]

// Prompt constants for resume extraction.

use crate::llm::prompts::JSON_ONLY_RULES;

/// Canonical resume sections and the vendor wordings that map onto them.
/// A pure lookup; a synonym missing here is a silent extraction miss, never
/// a crash, so the table errs on the side of breadth.
pub const SECTION_ALIASES: &[(&str, &[&str])] = &[
    (
        "experience",
        &[
            "experience",
            "work experience",
            "work history",
            "employment",
            "employment history",
            "professional experience",
            "professional background",
            "career history",
            "relevant experience",
        ],
    ),
    (
        "education",
        &[
            "education",
            "academic background",
            "academics",
            "academic history",
            "qualifications",
            "education and training",
        ],
    ),
    (
        "skills",
        &[
            "skills",
            "technical skills",
            "core competencies",
            "competencies",
            "technologies",
            "tech stack",
            "areas of expertise",
            "expertise",
        ],
    ),
    (
        "certifications",
        &[
            "certifications",
            "certificates",
            "licenses",
            "licenses and certifications",
            "credentials",
            "professional certifications",
        ],
    ),
    (
        "projects",
        &[
            "projects",
            "personal projects",
            "selected projects",
            "side projects",
            "portfolio",
            "open source",
        ],
    ),
    (
        "keyArchitecturalProjects",
        &[
            "key architectural projects",
            "architectural projects",
            "architecture highlights",
        ],
    ),
    (
        "summary",
        &[
            "summary",
            "professional summary",
            "objective",
            "career objective",
            "profile",
            "professional profile",
            "about",
            "about me",
        ],
    ),
];

/// Maps a resume section header to its canonical section, case-insensitively.
/// Returns `None` for headers the table does not know.
pub fn canonical_section(header: &str) -> Option<&'static str> {
    let needle = header.trim().trim_end_matches(':').trim().to_lowercase();
    SECTION_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&needle.as_str()))
        .map(|(canonical, _)| *canonical)
}

/// Extraction prompt. Replace `{section_aliases}`, `{json_only_rules}` and
/// `{resume_text}` before sending. The JSON shape is fixed; ids are assigned
/// locally after parsing, never requested from the model.
const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Parse this resume text and extract structured data. Return ONLY valid JSON with this exact structure:
{
  "personalInfo": {
    "name": "Full Name",
    "email": "email@example.com",
    "phone": "+1234567890",
    "website": "https://website.com",
    "location": "City, State",
    "summary": "Professional summary or objective"
  },
  "experience": [
    {
      "jobTitle": "Job Title",
      "company": "Company Name",
      "location": "City, State",
      "startDate": "Jan 2020",
      "endDate": "Present",
      "description": [
        "Achievement or responsibility bullet point 1",
        "Achievement or responsibility bullet point 2"
      ],
      "keyTech": "Technologies used (optional)"
    }
  ],
  "education": [
    {
      "degree": "Degree Name",
      "institution": "University Name",
      "location": "City, State",
      "gradDate": "May 2020"
    }
  ],
  "certifications": [
    {
      "name": "Certification Name"
    }
  ],
  "skills": [
    {
      "name": "Skill Name",
      "years": 5
    }
  ],
  "projects": [
    {
      "name": "Project Name",
      "description": "Project description",
      "link": "https://project-link.com"
    }
  ],
  "keyArchitecturalProjects": []
}

SECTION MAPPING — resumes name their sections inconsistently. Map any of the
following headings (and close variants) onto the canonical field shown:
{section_aliases}

IMPORTANT:
- description must be an array of strings (bullet points)
- years must be a number (0 if unknown)
- Extract all information from the resume
- If a field is missing, use empty string or empty array
- Do not add id fields - they will be added automatically

{json_only_rules}

Resume text:
{resume_text}"#;

/// Builds the extraction prompt for one resume.
pub fn build_extraction_prompt(resume_text: &str) -> String {
    EXTRACTION_PROMPT_TEMPLATE
        .replace("{section_aliases}", &alias_table_lines())
        .replace("{json_only_rules}", JSON_ONLY_RULES)
        .replace("{resume_text}", resume_text)
}

fn alias_table_lines() -> String {
    SECTION_ALIASES
        .iter()
        .map(|(canonical, aliases)| format!("- {}: {}", canonical, aliases.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}
