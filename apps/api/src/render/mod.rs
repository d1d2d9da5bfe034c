//! Template projection: a pure mapping from a document to a rendered structure.
//!
//! The structure is what every downstream consumer works from: the HTML
//! preview, the rasterizer behind the PDF export, and the preview JSON
//! endpoint. Same input, same output; nothing here touches shared state.

pub mod handlers;
pub mod html;
pub mod templates;

use serde::{Deserialize, Serialize};

use crate::models::resume::{ResumeDocument, Template};

pub use html::render_preview_html;

/// Shown in place of an empty full name.
pub const NAME_PLACEHOLDER: &str = "Your Name";

// ────────────────────────────────────────────────────────────────────────────
// Rendered structure
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeaderLayout {
    /// Name and a single contact row, both centered.
    Centered,
    /// Centered name over a full-width rule, then the contact row.
    Ruled,
    /// Name on the left, contact items stacked on the right.
    Split,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeadingStyle {
    Underlined,
    AccentBar,
    SmallCapsRule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedHeader {
    pub name: String,
    pub contact: Vec<String>,
    pub layout: HeaderLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Summary,
    Skills,
    Experience,
    Education,
    Certifications,
    Projects,
    Awards,
    Languages,
}

/// One entry within a section (a job, a degree, a project, …).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedItem {
    pub title: String,
    pub subtitle: Option<String>,
    /// Dates or similar; placed on the title line when `meta_inline` is set.
    pub meta: Option<String>,
    pub meta_inline: bool,
    pub details: Vec<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum SectionBody {
    Paragraph(String),
    Chips(Vec<String>),
    Items(Vec<RenderedItem>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSection {
    pub kind: SectionKind,
    pub title: String,
    pub body: SectionBody,
}

/// A document projected through one template variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedResume {
    pub template: Template,
    pub header: RenderedHeader,
    pub heading_style: HeadingStyle,
    pub sections: Vec<RenderedSection>,
    /// Preview-only label naming the template; never part of an export.
    pub badge: String,
}

impl RenderedResume {
    pub fn section(&self, kind: SectionKind) -> Option<&RenderedSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Selector
// ────────────────────────────────────────────────────────────────────────────

/// Projects `doc` through `template`.
pub fn project(doc: &ResumeDocument, template: Template) -> RenderedResume {
    match template {
        Template::Minimal => templates::minimal(doc),
        Template::Modern => templates::modern(doc),
        Template::Classic => templates::classic(doc),
    }
}

/// Projects `doc` through the template named `selector`; unknown names render
/// with `Modern`.
pub fn project_named(doc: &ResumeDocument, selector: &str) -> RenderedResume {
    project(doc, Template::from_name_or_default(selector))
}

/// Projects `doc` through its own selected template.
pub fn project_selected(doc: &ResumeDocument) -> RenderedResume {
    project(doc, doc.additional_options.template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{EducationEntry, WorkExperienceEntry};

    fn populated() -> ResumeDocument {
        let mut doc = ResumeDocument::default();
        doc.personal_info.full_name = "Linus".to_string();
        doc.personal_info.email = "linus@example.com".to_string();
        doc.career_objective = "Kernels".to_string();
        doc.skills = "C, Git".to_string();
        doc.work_experience.push(WorkExperienceEntry {
            job_title: "Maintainer".to_string(),
            company_name: "Linux Foundation".to_string(),
            start_date: "1991".to_string(),
            end_date: "Present".to_string(),
            responsibilities: vec!["Merge windows".to_string()],
            ..Default::default()
        });
        doc.education.push(EducationEntry {
            degree_title: "MSc".to_string(),
            university_name: "Helsinki".to_string(),
            graduation_year: "1996".to_string(),
            ..Default::default()
        });
        doc
    }

    #[test]
    fn test_projection_is_deterministic() {
        let doc = populated();
        for template in Template::ALL {
            assert_eq!(project(&doc, template), project(&doc, template));
        }
    }

    #[test]
    fn test_unknown_selector_renders_modern() {
        let doc = populated();
        assert_eq!(project_named(&doc, "Brutalist"), project(&doc, Template::Modern));
        assert_eq!(project_named(&doc, "").template, Template::Modern);
    }

    #[test]
    fn test_every_variant_keeps_core_sections() {
        let doc = populated();
        for template in Template::ALL {
            let rendered = project(&doc, template);
            assert_eq!(rendered.header.name, "Linus");
            for kind in [
                SectionKind::Summary,
                SectionKind::Skills,
                SectionKind::Experience,
                SectionKind::Education,
            ] {
                assert!(rendered.section(kind).is_some(), "{template:?} dropped {kind:?}");
            }
        }
    }

    #[test]
    fn test_project_selected_uses_document_template() {
        let mut doc = populated();
        doc.additional_options.template = Template::Classic;
        assert_eq!(project_selected(&doc).template, Template::Classic);
    }
}
