//! Sanitizer: decodes untrusted stored data into a valid document.
//!
//! Every field is checked individually: a value of the expected JSON type is
//! kept, anything else falls back to the default. Collections drop non-object
//! elements. Entry ids are unique across the whole document; a missing or
//! repeated id is replaced with a fresh one. Nothing here can fail; the worst
//! input yields the default document.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::models::resume::{
    new_entry_id, AdditionalOptions, AwardEntry, CertificationEntry, EducationEntry,
    ExportFormat, LanguageEntry, PersonalInfo, ProjectEntry, ResumeDocument, Template,
    WorkExperienceEntry,
};

/// Builds a valid `ResumeDocument` from an arbitrary JSON value.
pub fn sanitize_document(raw: &Value) -> ResumeDocument {
    let Some(obj) = raw.as_object() else {
        return ResumeDocument::default();
    };

    // Older payloads may use `options` instead of `additionalOptions`.
    let options = obj.get("additionalOptions").or_else(|| obj.get("options"));
    let mut seen = HashSet::new();

    ResumeDocument {
        personal_info: sanitize_personal_info(obj.get("personalInfo")),
        career_objective: string_field(obj, "careerObjective"),
        skills: string_field(obj, "skills"),
        work_experience: sanitize_entries(obj.get("workExperience"), &mut seen, sanitize_work_entry),
        education: sanitize_entries(obj.get("education"), &mut seen, sanitize_education_entry),
        certifications: sanitize_entries(
            obj.get("certifications"),
            &mut seen,
            sanitize_certification_entry,
        ),
        projects: sanitize_entries(obj.get("projects"), &mut seen, sanitize_project_entry),
        awards: sanitize_entries(obj.get("awards"), &mut seen, sanitize_award_entry),
        languages: sanitize_entries(obj.get("languages"), &mut seen, sanitize_language_entry),
        keywords: string_field(obj, "keywords"),
        additional_options: sanitize_options(options),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field helpers
// ────────────────────────────────────────────────────────────────────────────

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn bool_field(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or_default()
}

/// Keeps a non-empty string id not already used elsewhere in the document,
/// otherwise mints a new one.
fn id_field(obj: &Map<String, Value>, seen: &mut HashSet<String>) -> String {
    let id = match obj.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() && !seen.contains(id) => id.to_string(),
        _ => new_entry_id(),
    };
    seen.insert(id.clone());
    id
}

fn sanitize_entries<T>(
    value: Option<&Value>,
    seen: &mut HashSet<String>,
    sanitize: fn(&Map<String, Value>, String) -> T,
) -> Vec<T> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|obj| sanitize(obj, id_field(obj, seen)))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Nested objects
// ────────────────────────────────────────────────────────────────────────────

fn sanitize_personal_info(value: Option<&Value>) -> PersonalInfo {
    let Some(obj) = value.and_then(Value::as_object) else {
        return PersonalInfo::default();
    };
    PersonalInfo {
        full_name: string_field(obj, "fullName"),
        email: string_field(obj, "email"),
        phone: string_field(obj, "phone"),
        linkedin: string_field(obj, "linkedin"),
        portfolio: string_field(obj, "portfolio"),
        location: string_field(obj, "location"),
    }
}

fn sanitize_options(value: Option<&Value>) -> AdditionalOptions {
    let Some(obj) = value.and_then(Value::as_object) else {
        return AdditionalOptions::default();
    };
    AdditionalOptions {
        template: obj
            .get("template")
            .and_then(Value::as_str)
            .and_then(Template::from_name)
            .unwrap_or_default(),
        export_format: obj
            .get("exportFormat")
            .and_then(Value::as_str)
            .and_then(ExportFormat::from_name)
            .unwrap_or_default(),
        add_cover_letter: bool_field(obj, "addCoverLetter"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry sanitizers
// ────────────────────────────────────────────────────────────────────────────

fn sanitize_work_entry(obj: &Map<String, Value>, id: String) -> WorkExperienceEntry {
    let mut responsibilities: Vec<String> = match obj.get("responsibilities") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
    if responsibilities.is_empty() {
        responsibilities.push(String::new());
    }

    WorkExperienceEntry {
        id,
        job_title: string_field(obj, "jobTitle"),
        company_name: string_field(obj, "companyName"),
        location: string_field(obj, "location"),
        start_date: string_field(obj, "startDate"),
        end_date: string_field(obj, "endDate"),
        responsibilities,
    }
}

fn sanitize_education_entry(obj: &Map<String, Value>, id: String) -> EducationEntry {
    EducationEntry {
        id,
        degree_title: string_field(obj, "degreeTitle"),
        university_name: string_field(obj, "universityName"),
        graduation_year: string_field(obj, "graduationYear"),
        gpa: string_field(obj, "gpa"),
    }
}

fn sanitize_certification_entry(obj: &Map<String, Value>, id: String) -> CertificationEntry {
    CertificationEntry {
        id,
        name: string_field(obj, "name"),
        issued_by: string_field(obj, "issuedBy"),
        completion_date: string_field(obj, "completionDate"),
    }
}

fn sanitize_project_entry(obj: &Map<String, Value>, id: String) -> ProjectEntry {
    ProjectEntry {
        id,
        title: string_field(obj, "title"),
        technologies: string_field(obj, "technologies"),
        description: string_field(obj, "description"),
        link: string_field(obj, "link"),
    }
}

fn sanitize_award_entry(obj: &Map<String, Value>, id: String) -> AwardEntry {
    AwardEntry {
        id,
        name: string_field(obj, "name"),
        date: string_field(obj, "date"),
        description: string_field(obj, "description"),
    }
}

fn sanitize_language_entry(obj: &Map<String, Value>, id: String) -> LanguageEntry {
    LanguageEntry {
        id,
        language: string_field(obj, "language"),
        proficiency: string_field(obj, "proficiency"),
    }
}
