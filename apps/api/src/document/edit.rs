//! Edit reducer: the only way a document changes.
//!
//! `apply_edit` takes the current document and an `Edit` and returns a new
//! document. The input is never mutated; a rejected edit leaves the caller's
//! document exactly as it was.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::resume::{
    AwardEntry, CertificationEntry, EducationEntry, Entry, ExportFormat, LanguageEntry,
    ProjectEntry, ResumeDocument, Section, Template, WorkExperienceEntry,
};

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("invalid field path '{0}'")]
    InvalidPath(String),

    #[error("unknown field '{field}' for {target}")]
    UnknownField { target: String, field: String },

    #[error("field '{0}' cannot be edited")]
    ImmutableField(String),

    #[error("field '{field}' expects {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("'{value}' is not a valid {field}")]
    InvalidValue { field: String, value: String },

    #[error("no {section} entry with id '{id}'")]
    EntryNotFound { section: &'static str, id: String },

    #[error("responsibility index {index} out of range ({len} items)")]
    IndexOutOfRange { index: usize, len: usize },
}

// ────────────────────────────────────────────────────────────────────────────
// Edit operations
// ────────────────────────────────────────────────────────────────────────────

/// A single form interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Edit {
    /// Replace one field addressed by a dotted path.
    Set { path: String, value: Value },
    #[serde(rename_all = "camelCase")]
    AddEntry { section: Section },
    #[serde(rename_all = "camelCase")]
    RemoveEntry { section: Section, id: String },
    #[serde(rename_all = "camelCase")]
    AddResponsibility { entry_id: String },
    #[serde(rename_all = "camelCase")]
    RemoveResponsibility { entry_id: String, index: usize },
}

/// Applies an edit to a copy of `doc`.
pub fn apply_edit(doc: &ResumeDocument, edit: &Edit) -> Result<ResumeDocument, EditError> {
    match edit {
        Edit::Set { path, value } => {
            let path = FieldPath::from_str(path)?;
            set_field(doc, &path, value)
        }
        Edit::AddEntry { section } => Ok(add_entry(doc, *section)),
        Edit::RemoveEntry { section, id } => remove_entry(doc, *section, id),
        Edit::AddResponsibility { entry_id } => {
            let mut next = doc.clone();
            work_entry_mut(&mut next, entry_id)?
                .responsibilities
                .push(String::new());
            Ok(next)
        }
        Edit::RemoveResponsibility { entry_id, index } => {
            remove_responsibility(doc, entry_id, *index)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field paths
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonalField {
    FullName,
    Email,
    Phone,
    Linkedin,
    Portfolio,
    Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionField {
    Template,
    ExportFormat,
    AddCoverLetter,
}

/// A parsed dotted path into the document.
///
/// Entry paths are `<section>.<entryId>.<field>`; ids may themselves contain
/// dots, so the field is taken from the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    CareerObjective,
    Skills,
    Keywords,
    PersonalInfo(PersonalField),
    Option(OptionField),
    Entry {
        section: Section,
        id: String,
        field: String,
    },
    Responsibility {
        entry_id: String,
        index: usize,
    },
}

impl FromStr for FieldPath {
    type Err = EditError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let invalid = || EditError::InvalidPath(path.to_string());
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };

        match (head, rest) {
            ("careerObjective", None) => Ok(FieldPath::CareerObjective),
            ("skills", None) => Ok(FieldPath::Skills),
            ("keywords", None) => Ok(FieldPath::Keywords),
            ("personalInfo", Some(field)) => {
                let field = match field {
                    "fullName" => PersonalField::FullName,
                    "email" => PersonalField::Email,
                    "phone" => PersonalField::Phone,
                    "linkedin" => PersonalField::Linkedin,
                    "portfolio" => PersonalField::Portfolio,
                    "location" => PersonalField::Location,
                    other => {
                        return Err(EditError::UnknownField {
                            target: "personalInfo".to_string(),
                            field: other.to_string(),
                        })
                    }
                };
                Ok(FieldPath::PersonalInfo(field))
            }
            ("additionalOptions" | "options", Some(field)) => {
                let field = match field {
                    "template" => OptionField::Template,
                    "exportFormat" => OptionField::ExportFormat,
                    "addCoverLetter" => OptionField::AddCoverLetter,
                    other => {
                        return Err(EditError::UnknownField {
                            target: "additionalOptions".to_string(),
                            field: other.to_string(),
                        })
                    }
                };
                Ok(FieldPath::Option(field))
            }
            (section, Some(rest)) => {
                let section = Section::from_key(section).ok_or_else(invalid)?;
                if section == Section::WorkExperience {
                    if let Some((prefix, index)) = rest.rsplit_once('.') {
                        if let Some(entry_id) = prefix.strip_suffix(".responsibilities") {
                            let index = index.parse::<usize>().map_err(|_| invalid())?;
                            if entry_id.is_empty() {
                                return Err(invalid());
                            }
                            return Ok(FieldPath::Responsibility {
                                entry_id: entry_id.to_string(),
                                index,
                            });
                        }
                    }
                }
                let (id, field) = rest.rsplit_once('.').ok_or_else(invalid)?;
                if id.is_empty() || field.is_empty() {
                    return Err(invalid());
                }
                Ok(FieldPath::Entry {
                    section,
                    id: id.to_string(),
                    field: field.to_string(),
                })
            }
            _ => Err(invalid()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Set
// ────────────────────────────────────────────────────────────────────────────

fn expect_str<'a>(field: &str, value: &'a Value) -> Result<&'a str, EditError> {
    value.as_str().ok_or_else(|| EditError::WrongType {
        field: field.to_string(),
        expected: "a string",
    })
}

/// Replaces the field at `path` with `value` on a copy of `doc`.
pub fn set_field(
    doc: &ResumeDocument,
    path: &FieldPath,
    value: &Value,
) -> Result<ResumeDocument, EditError> {
    let mut next = doc.clone();

    match path {
        FieldPath::CareerObjective => {
            next.career_objective = expect_str("careerObjective", value)?.to_string()
        }
        FieldPath::Skills => next.skills = expect_str("skills", value)?.to_string(),
        FieldPath::Keywords => next.keywords = expect_str("keywords", value)?.to_string(),
        FieldPath::PersonalInfo(field) => {
            let text = expect_str("personalInfo", value)?.to_string();
            let info = &mut next.personal_info;
            match field {
                PersonalField::FullName => info.full_name = text,
                PersonalField::Email => info.email = text,
                PersonalField::Phone => info.phone = text,
                PersonalField::Linkedin => info.linkedin = text,
                PersonalField::Portfolio => info.portfolio = text,
                PersonalField::Location => info.location = text,
            }
        }
        FieldPath::Option(OptionField::Template) => {
            let name = expect_str("template", value)?;
            next.additional_options.template =
                Template::from_name(name).ok_or_else(|| EditError::InvalidValue {
                    field: "template".to_string(),
                    value: name.to_string(),
                })?;
        }
        FieldPath::Option(OptionField::ExportFormat) => {
            let name = expect_str("exportFormat", value)?;
            next.additional_options.export_format =
                ExportFormat::from_name(name).ok_or_else(|| EditError::InvalidValue {
                    field: "exportFormat".to_string(),
                    value: name.to_string(),
                })?;
        }
        FieldPath::Option(OptionField::AddCoverLetter) => {
            next.additional_options.add_cover_letter =
                value.as_bool().ok_or_else(|| EditError::WrongType {
                    field: "addCoverLetter".to_string(),
                    expected: "a boolean",
                })?;
        }
        FieldPath::Entry { section, id, field } => {
            set_entry_field(&mut next, *section, id, field, value)?
        }
        FieldPath::Responsibility { entry_id, index } => {
            let text = expect_str("responsibilities", value)?.to_string();
            let entry = work_entry_mut(&mut next, entry_id)?;
            let len = entry.responsibilities.len();
            let slot = entry
                .responsibilities
                .get_mut(*index)
                .ok_or(EditError::IndexOutOfRange { index: *index, len })?;
            *slot = text;
        }
    }

    Ok(next)
}

fn find_entry<'a, T: Entry>(
    entries: &'a mut [T],
    section: Section,
    id: &str,
) -> Result<&'a mut T, EditError> {
    entries
        .iter_mut()
        .find(|e| e.id() == id)
        .ok_or_else(|| EditError::EntryNotFound {
            section: section.key(),
            id: id.to_string(),
        })
}

fn work_entry_mut<'a>(
    doc: &'a mut ResumeDocument,
    id: &str,
) -> Result<&'a mut WorkExperienceEntry, EditError> {
    find_entry(&mut doc.work_experience, Section::WorkExperience, id)
}

fn set_entry_field(
    doc: &mut ResumeDocument,
    section: Section,
    id: &str,
    field: &str,
    value: &Value,
) -> Result<(), EditError> {
    if field == "id" {
        return Err(EditError::ImmutableField("id".to_string()));
    }
    let unknown = || EditError::UnknownField {
        target: section.key().to_string(),
        field: field.to_string(),
    };

    match section {
        Section::WorkExperience => {
            let entry = work_entry_mut(doc, id)?;
            if field == "responsibilities" {
                let items = value.as_array().ok_or_else(|| EditError::WrongType {
                    field: "responsibilities".to_string(),
                    expected: "an array of strings",
                })?;
                let mut list = items
                    .iter()
                    .map(|item| expect_str("responsibilities", item).map(str::to_string))
                    .collect::<Result<Vec<_>, _>>()?;
                if list.is_empty() {
                    list.push(String::new());
                }
                entry.responsibilities = list;
                return Ok(());
            }
            let text = expect_str(field, value)?.to_string();
            match field {
                "jobTitle" => entry.job_title = text,
                "companyName" => entry.company_name = text,
                "location" => entry.location = text,
                "startDate" => entry.start_date = text,
                "endDate" => entry.end_date = text,
                _ => return Err(unknown()),
            }
        }
        Section::Education => {
            let entry = find_entry(&mut doc.education, section, id)?;
            let text = expect_str(field, value)?.to_string();
            match field {
                "degreeTitle" => entry.degree_title = text,
                "universityName" => entry.university_name = text,
                "graduationYear" => entry.graduation_year = text,
                "gpa" => entry.gpa = text,
                _ => return Err(unknown()),
            }
        }
        Section::Certifications => {
            let entry = find_entry(&mut doc.certifications, section, id)?;
            let text = expect_str(field, value)?.to_string();
            match field {
                "name" => entry.name = text,
                "issuedBy" => entry.issued_by = text,
                "completionDate" => entry.completion_date = text,
                _ => return Err(unknown()),
            }
        }
        Section::Projects => {
            let entry = find_entry(&mut doc.projects, section, id)?;
            let text = expect_str(field, value)?.to_string();
            match field {
                "title" => entry.title = text,
                "technologies" => entry.technologies = text,
                "description" => entry.description = text,
                "link" => entry.link = text,
                _ => return Err(unknown()),
            }
        }
        Section::Awards => {
            let entry = find_entry(&mut doc.awards, section, id)?;
            let text = expect_str(field, value)?.to_string();
            match field {
                "name" => entry.name = text,
                "date" => entry.date = text,
                "description" => entry.description = text,
                _ => return Err(unknown()),
            }
        }
        Section::Languages => {
            let entry = find_entry(&mut doc.languages, section, id)?;
            let text = expect_str(field, value)?.to_string();
            match field {
                "language" => entry.language = text,
                "proficiency" => entry.proficiency = text,
                _ => return Err(unknown()),
            }
        }
    }

    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Structural edits
// ────────────────────────────────────────────────────────────────────────────

fn add_entry(doc: &ResumeDocument, section: Section) -> ResumeDocument {
    let mut next = doc.clone();
    match section {
        Section::WorkExperience => next.work_experience.push(WorkExperienceEntry::default()),
        Section::Education => next.education.push(EducationEntry::default()),
        Section::Certifications => next.certifications.push(CertificationEntry::default()),
        Section::Projects => next.projects.push(ProjectEntry::default()),
        Section::Awards => next.awards.push(AwardEntry::default()),
        Section::Languages => next.languages.push(LanguageEntry::default()),
    }
    next
}

fn remove_by_id<T: Entry>(
    entries: &mut Vec<T>,
    section: Section,
    id: &str,
) -> Result<(), EditError> {
    let index = entries
        .iter()
        .position(|e| e.id() == id)
        .ok_or_else(|| EditError::EntryNotFound {
            section: section.key(),
            id: id.to_string(),
        })?;
    entries.remove(index);
    Ok(())
}

fn remove_entry(
    doc: &ResumeDocument,
    section: Section,
    id: &str,
) -> Result<ResumeDocument, EditError> {
    let mut next = doc.clone();
    match section {
        Section::WorkExperience => remove_by_id(&mut next.work_experience, section, id)?,
        Section::Education => remove_by_id(&mut next.education, section, id)?,
        Section::Certifications => remove_by_id(&mut next.certifications, section, id)?,
        Section::Projects => remove_by_id(&mut next.projects, section, id)?,
        Section::Awards => remove_by_id(&mut next.awards, section, id)?,
        Section::Languages => remove_by_id(&mut next.languages, section, id)?,
    }
    Ok(next)
}

/// Removes one responsibility. The list is never left empty: removing the last
/// item leaves a single blank placeholder.
fn remove_responsibility(
    doc: &ResumeDocument,
    entry_id: &str,
    index: usize,
) -> Result<ResumeDocument, EditError> {
    let mut next = doc.clone();
    let entry = work_entry_mut(&mut next, entry_id)?;
    let len = entry.responsibilities.len();
    if index >= len {
        return Err(EditError::IndexOutOfRange { index, len });
    }
    entry.responsibilities.remove(index);
    if entry.responsibilities.is_empty() {
        entry.responsibilities.push(String::new());
    }
    Ok(next)
}
