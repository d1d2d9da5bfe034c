use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mints a fresh entry identifier.
pub fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Enumerated options
// ────────────────────────────────────────────────────────────────────────────

/// The closed set of visual layouts a document can be projected into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Template {
    Minimal,
    #[default]
    Modern,
    Classic,
}

impl Template {
    pub const ALL: [Template; 3] = [Template::Minimal, Template::Modern, Template::Classic];

    pub fn name(&self) -> &'static str {
        match self {
            Template::Minimal => "Minimal",
            Template::Modern => "Modern",
            Template::Classic => "Classic",
        }
    }

    /// Exact-name lookup. Returns `None` for anything outside the enumeration.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Lookup that never fails: unknown selectors fall back to `Modern`.
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "DOCX")]
    Docx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Pdf, ExportFormat::Docx];

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Docx => "DOCX",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Rendering and export preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalOptions {
    pub template: Template,
    pub export_format: ExportFormat,
    /// Placeholder only: emits a cover-letter block in the markup export.
    pub add_cover_letter: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Personal info
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub portfolio: String,
    pub location: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Repeatable entries
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperienceEntry {
    pub id: String,
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    /// Free-form, e.g. `MM/YYYY`.
    pub start_date: String,
    /// Free-form, e.g. `MM/YYYY` or `Present`.
    pub end_date: String,
    /// Never empty. Removing the last item leaves a single blank placeholder.
    pub responsibilities: Vec<String>,
}

impl Default for WorkExperienceEntry {
    fn default() -> Self {
        Self {
            id: new_entry_id(),
            job_title: String::new(),
            company_name: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            responsibilities: vec![String::new()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub id: String,
    pub degree_title: String,
    pub university_name: String,
    pub graduation_year: String,
    pub gpa: String,
}

impl Default for EducationEntry {
    fn default() -> Self {
        Self {
            id: new_entry_id(),
            degree_title: String::new(),
            university_name: String::new(),
            graduation_year: String::new(),
            gpa: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationEntry {
    pub id: String,
    pub name: String,
    pub issued_by: String,
    pub completion_date: String,
}

impl Default for CertificationEntry {
    fn default() -> Self {
        Self {
            id: new_entry_id(),
            name: String::new(),
            issued_by: String::new(),
            completion_date: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub id: String,
    pub title: String,
    /// Comma-separated.
    pub technologies: String,
    pub description: String,
    pub link: String,
}

impl Default for ProjectEntry {
    fn default() -> Self {
        Self {
            id: new_entry_id(),
            title: String::new(),
            technologies: String::new(),
            description: String::new(),
            link: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardEntry {
    pub id: String,
    pub name: String,
    pub date: String,
    pub description: String,
}

impl Default for AwardEntry {
    fn default() -> Self {
        Self {
            id: new_entry_id(),
            name: String::new(),
            date: String::new(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageEntry {
    pub id: String,
    pub language: String,
    /// e.g. Native, Fluent, Conversational.
    pub proficiency: String,
}

impl Default for LanguageEntry {
    fn default() -> Self {
        Self {
            id: new_entry_id(),
            language: String::new(),
            proficiency: String::new(),
        }
    }
}

/// Common behaviour of every repeatable entry.
pub trait Entry: Clone + Default {
    fn id(&self) -> &str;
}

macro_rules! impl_entry {
    ($($ty:ty),+ $(,)?) => {
        $(impl Entry for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })+
    };
}

impl_entry!(
    WorkExperienceEntry,
    EducationEntry,
    CertificationEntry,
    ProjectEntry,
    AwardEntry,
    LanguageEntry,
);

/// The repeatable sections of a resume, addressed by their camelCase JSON key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    WorkExperience,
    Education,
    Certifications,
    Projects,
    Awards,
    Languages,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::WorkExperience,
        Section::Education,
        Section::Certifications,
        Section::Projects,
        Section::Awards,
        Section::Languages,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Section::WorkExperience => "workExperience",
            Section::Education => "education",
            Section::Certifications => "certifications",
            Section::Projects => "projects",
            Section::Awards => "awards",
            Section::Languages => "languages",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Root aggregate
// ────────────────────────────────────────────────────────────────────────────

/// The canonical resume document. Always fully populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub career_objective: String,
    /// Comma-delimited; callers split on demand.
    pub skills: String,
    pub work_experience: Vec<WorkExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub projects: Vec<ProjectEntry>,
    pub awards: Vec<AwardEntry>,
    pub languages: Vec<LanguageEntry>,
    /// Comma-delimited.
    pub keywords: String,
    pub additional_options: AdditionalOptions,
}

impl ResumeDocument {
    /// Every entry id across all sections, in document order.
    pub fn entry_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        ids.extend(self.work_experience.iter().map(|e| e.id.as_str()));
        ids.extend(self.education.iter().map(|e| e.id.as_str()));
        ids.extend(self.certifications.iter().map(|e| e.id.as_str()));
        ids.extend(self.projects.iter().map(|e| e.id.as_str()));
        ids.extend(self.awards.iter().map(|e| e.id.as_str()));
        ids.extend(self.languages.iter().map(|e| e.id.as_str()));
        ids
    }
}

/// Splits a comma-delimited field into trimmed, non-empty items.
pub fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_options() {
        let doc = ResumeDocument::default();
        assert_eq!(doc.additional_options.template, Template::Modern);
        assert_eq!(doc.additional_options.export_format, ExportFormat::Pdf);
        assert!(!doc.additional_options.add_cover_letter);
        assert!(doc.work_experience.is_empty());
        assert_eq!(doc.personal_info.full_name, "");
    }

    #[test]
    fn test_new_work_entry_has_one_blank_responsibility() {
        let entry = WorkExperienceEntry::default();
        assert_eq!(entry.responsibilities, vec![String::new()]);
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn test_entry_ids_are_unique() {
        let a = EducationEntry::default();
        let b = EducationEntry::default();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_template_lenient_lookup() {
        assert_eq!(Template::from_name("Classic"), Some(Template::Classic));
        assert_eq!(Template::from_name("classic"), None);
        assert_eq!(Template::from_name_or_default("Fancy"), Template::Modern);
    }

    #[test]
    fn test_export_format_serde_names() {
        assert_eq!(serde_json::to_string(&ExportFormat::Docx).unwrap(), "\"DOCX\"");
        let f: ExportFormat = serde_json::from_str("\"PDF\"").unwrap();
        assert_eq!(f, ExportFormat::Pdf);
    }

    #[test]
    fn test_document_serializes_camel_case() {
        let json = serde_json::to_value(ResumeDocument::default()).unwrap();
        assert!(json.get("personalInfo").is_some());
        assert!(json.get("careerObjective").is_some());
        assert_eq!(json["additionalOptions"]["exportFormat"], "PDF");
        assert_eq!(json["additionalOptions"]["addCoverLetter"], false);
    }

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        assert_eq!(split_list(" Rust, , Go ,"), vec!["Rust", "Go"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_section_keys_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_key(section.key()), Some(section));
        }
        assert_eq!(Section::from_key("hobbies"), None);
    }
}
