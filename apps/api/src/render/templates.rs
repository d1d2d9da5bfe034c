//! The three template arrangements.
//!
//! Every variant consumes the same document and emits the same
//! [`RenderedResume`] shape; they differ in header layout, heading names,
//! contact order and how entry lines are composed.

use crate::models::resume::{
    split_list, AwardEntry, CertificationEntry, EducationEntry, LanguageEntry, PersonalInfo,
    ProjectEntry, ResumeDocument, Template, WorkExperienceEntry,
};

use super::{
    HeaderLayout, HeadingStyle, RenderedHeader, RenderedItem, RenderedResume, RenderedSection,
    SectionBody, SectionKind, NAME_PLACEHOLDER,
};

#[derive(Debug, Clone, Copy)]
enum Contact {
    Email,
    Phone,
    Location,
    Linkedin,
    Portfolio,
}

impl Contact {
    fn value(self, info: &PersonalInfo) -> &str {
        match self {
            Contact::Email => &info.email,
            Contact::Phone => &info.phone,
            Contact::Location => &info.location,
            Contact::Linkedin => &info.linkedin,
            Contact::Portfolio => &info.portfolio,
        }
    }
}

/// Section headings in projection order.
struct Headings {
    summary: &'static str,
    skills: &'static str,
    experience: &'static str,
    education: &'static str,
    certifications: &'static str,
    projects: &'static str,
    awards: &'static str,
    languages: &'static str,
}

struct Arrangement {
    template: Template,
    layout: HeaderLayout,
    heading_style: HeadingStyle,
    contacts: [Contact; 5],
    headings: Headings,
    skills_as_chips: bool,
    work: fn(&WorkExperienceEntry) -> RenderedItem,
    education: fn(&EducationEntry) -> RenderedItem,
    /// Joins a title with its issuer/qualifier when they share a line.
    inline_titles: bool,
}

const MINIMAL: Arrangement = Arrangement {
    template: Template::Minimal,
    layout: HeaderLayout::Centered,
    heading_style: HeadingStyle::Underlined,
    contacts: [
        Contact::Email,
        Contact::Phone,
        Contact::Location,
        Contact::Linkedin,
        Contact::Portfolio,
    ],
    headings: Headings {
        summary: "Summary",
        skills: "Skills",
        experience: "Experience",
        education: "Education",
        certifications: "Certifications",
        projects: "Projects",
        awards: "Awards",
        languages: "Languages",
    },
    skills_as_chips: false,
    work: minimal_work,
    education: stacked_education,
    inline_titles: false,
};

const MODERN: Arrangement = Arrangement {
    template: Template::Modern,
    layout: HeaderLayout::Split,
    heading_style: HeadingStyle::AccentBar,
    contacts: MINIMAL.contacts,
    headings: Headings {
        summary: "PROFILE",
        skills: "SKILLS",
        experience: "WORK EXPERIENCE",
        education: "EDUCATION",
        certifications: "CERTIFICATIONS",
        projects: "PROJECTS",
        awards: "AWARDS",
        languages: "LANGUAGES",
    },
    skills_as_chips: true,
    work: modern_work,
    education: stacked_education,
    inline_titles: false,
};

const CLASSIC: Arrangement = Arrangement {
    template: Template::Classic,
    layout: HeaderLayout::Ruled,
    heading_style: HeadingStyle::SmallCapsRule,
    contacts: [
        Contact::Location,
        Contact::Phone,
        Contact::Email,
        Contact::Linkedin,
        Contact::Portfolio,
    ],
    headings: Headings {
        summary: "Objective",
        skills: "Skills",
        experience: "Experience",
        education: "Education",
        certifications: "Certifications",
        projects: "Projects",
        awards: "Awards",
        languages: "Languages",
    },
    skills_as_chips: false,
    work: classic_work,
    education: classic_education,
    inline_titles: true,
};

pub fn minimal(doc: &ResumeDocument) -> RenderedResume {
    assemble(doc, &MINIMAL)
}

pub fn modern(doc: &ResumeDocument) -> RenderedResume {
    assemble(doc, &MODERN)
}

pub fn classic(doc: &ResumeDocument) -> RenderedResume {
    assemble(doc, &CLASSIC)
}

// ────────────────────────────────────────────────────────────────────────────
// Assembly
// ────────────────────────────────────────────────────────────────────────────

fn assemble(doc: &ResumeDocument, arr: &Arrangement) -> RenderedResume {
    let info = &doc.personal_info;
    let name = if info.full_name.is_empty() {
        NAME_PLACEHOLDER.to_string()
    } else {
        info.full_name.clone()
    };
    let contact = arr
        .contacts
        .iter()
        .map(|c| c.value(info))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();

    let h = &arr.headings;
    let mut sections = Vec::new();

    if !doc.career_objective.is_empty() {
        sections.push(RenderedSection {
            kind: SectionKind::Summary,
            title: h.summary.to_string(),
            body: SectionBody::Paragraph(doc.career_objective.clone()),
        });
    }

    if !doc.skills.is_empty() {
        let body = if arr.skills_as_chips {
            let chips: Vec<String> = split_list(&doc.skills).into_iter().map(String::from).collect();
            (!chips.is_empty()).then_some(SectionBody::Chips(chips))
        } else {
            Some(SectionBody::Paragraph(doc.skills.clone()))
        };
        if let Some(body) = body {
            sections.push(RenderedSection {
                kind: SectionKind::Skills,
                title: h.skills.to_string(),
                body,
            });
        }
    }

    push_items(&mut sections, SectionKind::Experience, h.experience, &doc.work_experience, arr.work);
    push_items(&mut sections, SectionKind::Education, h.education, &doc.education, arr.education);

    let inline = arr.inline_titles;
    push_items(&mut sections, SectionKind::Certifications, h.certifications, &doc.certifications, |e| {
        certification_item(e, inline)
    });
    push_items(&mut sections, SectionKind::Projects, h.projects, &doc.projects, project_item);
    push_items(&mut sections, SectionKind::Awards, h.awards, &doc.awards, |e| award_item(e, inline));
    push_items(&mut sections, SectionKind::Languages, h.languages, &doc.languages, language_item);

    RenderedResume {
        template: arr.template,
        header: RenderedHeader {
            name,
            contact,
            layout: arr.layout,
        },
        heading_style: arr.heading_style,
        sections,
        badge: format!("{} Template", arr.template.name()),
    }
}

fn push_items<T>(
    sections: &mut Vec<RenderedSection>,
    kind: SectionKind,
    title: &str,
    entries: &[T],
    item: impl Fn(&T) -> RenderedItem,
) {
    if entries.is_empty() {
        return;
    }
    sections.push(RenderedSection {
        kind,
        title: title.to_string(),
        body: SectionBody::Items(entries.iter().map(item).collect()),
    });
}

// ────────────────────────────────────────────────────────────────────────────
// Entry lines
// ────────────────────────────────────────────────────────────────────────────

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Joins the non-empty parts with `sep`; `None` when nothing is left.
fn join_present(parts: &[&str], sep: &str) -> Option<String> {
    let present: Vec<&str> = parts.iter().copied().filter(|p| !p.is_empty()).collect();
    (!present.is_empty()).then(|| present.join(sep))
}

/// `"{start} - {end}"`, with the separator kept when one side is empty.
/// `None` only when both dates are empty.
pub fn date_range(start: &str, end: &str) -> Option<String> {
    if start.is_empty() && end.is_empty() {
        return None;
    }
    Some(format!("{start} - {end}"))
}

fn bullets(responsibilities: &[String]) -> Vec<String> {
    responsibilities
        .iter()
        .filter(|r| !r.trim().is_empty())
        .cloned()
        .collect()
}

fn stacked_work(e: &WorkExperienceEntry, sep: &str) -> RenderedItem {
    RenderedItem {
        title: e.job_title.clone(),
        subtitle: join_present(&[&e.company_name, &e.location], sep),
        meta: date_range(&e.start_date, &e.end_date),
        meta_inline: false,
        details: Vec::new(),
        bullets: bullets(&e.responsibilities),
    }
}

fn minimal_work(e: &WorkExperienceEntry) -> RenderedItem {
    stacked_work(e, " - ")
}

fn modern_work(e: &WorkExperienceEntry) -> RenderedItem {
    stacked_work(e, " | ")
}

fn classic_work(e: &WorkExperienceEntry) -> RenderedItem {
    RenderedItem {
        title: join_present(&[&e.job_title, &e.company_name], ", ").unwrap_or_default(),
        subtitle: non_empty(&e.location),
        meta: date_range(&e.start_date, &e.end_date),
        meta_inline: true,
        details: Vec::new(),
        bullets: bullets(&e.responsibilities),
    }
}

fn stacked_education(e: &EducationEntry) -> RenderedItem {
    let mut graduated = format!("Graduated: {}", e.graduation_year);
    if !e.gpa.is_empty() {
        graduated.push_str(&format!(" - GPA: {}", e.gpa));
    }
    RenderedItem {
        title: e.degree_title.clone(),
        subtitle: non_empty(&e.university_name),
        meta: Some(graduated),
        ..Default::default()
    }
}

fn classic_education(e: &EducationEntry) -> RenderedItem {
    RenderedItem {
        title: join_present(&[&e.degree_title, &e.university_name], ", ").unwrap_or_default(),
        meta: non_empty(&e.graduation_year),
        meta_inline: true,
        details: non_empty(&e.gpa).map(|gpa| format!("GPA: {gpa}")).into_iter().collect(),
        ..Default::default()
    }
}

fn certification_item(e: &CertificationEntry, inline: bool) -> RenderedItem {
    if inline {
        RenderedItem {
            title: join_present(&[&e.name, &e.issued_by], ", ").unwrap_or_default(),
            meta: non_empty(&e.completion_date),
            meta_inline: true,
            ..Default::default()
        }
    } else {
        RenderedItem {
            title: e.name.clone(),
            subtitle: non_empty(&e.issued_by),
            meta: non_empty(&e.completion_date),
            ..Default::default()
        }
    }
}

fn project_item(e: &ProjectEntry) -> RenderedItem {
    let mut details = Vec::new();
    details.extend(non_empty(&e.description));
    details.extend(non_empty(&e.link));
    RenderedItem {
        title: e.title.clone(),
        subtitle: non_empty(&e.technologies),
        details,
        ..Default::default()
    }
}

fn award_item(e: &AwardEntry, inline: bool) -> RenderedItem {
    RenderedItem {
        title: e.name.clone(),
        meta: non_empty(&e.date),
        meta_inline: inline,
        details: non_empty(&e.description).into_iter().collect(),
        ..Default::default()
    }
}

fn language_item(e: &LanguageEntry) -> RenderedItem {
    RenderedItem {
        title: e.language.clone(),
        subtitle: non_empty(&e.proficiency),
        ..Default::default()
    }
}
