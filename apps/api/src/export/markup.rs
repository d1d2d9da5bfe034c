//! Word-compatible markup export.
//!
//! Renders straight from the document (not from a capture) into one
//! self-contained HTML file that word processors open as a `.doc`.

use crate::models::resume::{split_list, ResumeDocument};
use crate::render::html::escape_html;
use crate::render::templates::date_range;

const DOC_CSS: &str = "\
body { font-family: Calibri, Arial, sans-serif; font-size: 11pt; color: #111; }
h1 { font-size: 20pt; margin-bottom: 2pt; }
.contact { color: #555; font-size: 10pt; }
.section { margin-top: 12pt; }
.section h2 { font-size: 13pt; border-bottom: 1px solid #999; margin-bottom: 4pt; }
.entry { margin-bottom: 6pt; }
.meta { color: #555; font-size: 10pt; }";

const COVER_LETTER_PLACEHOLDER: &str =
    "A cover letter tailored to this resume will go here.";

fn e(value: &str) -> String {
    escape_html(value)
}

struct Builder {
    out: String,
}

impl Builder {
    fn section(&mut self, class: &str, title: &str, body: impl FnOnce(&mut String)) {
        self.out.push_str(&format!("<div class=\"section {class}\"><h2>{title}</h2>"));
        body(&mut self.out);
        self.out.push_str("</div>\n");
    }
}

fn entry(out: &mut String, title: &str, subtitle: &str, meta: Option<&str>) {
    out.push_str(&format!("<div class=\"entry\"><p><b>{}</b>", e(title)));
    if !subtitle.is_empty() {
        out.push_str(&format!("<br><i>{}</i>", e(subtitle)));
    }
    if let Some(meta) = meta.filter(|m| !m.is_empty()) {
        out.push_str(&format!("<br><span class=\"meta\">{}</span>", e(meta)));
    }
    out.push_str("</p>");
}

fn join_nonempty(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .copied()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Renders the whole document as a Word-compatible HTML file.
pub fn render_markup(doc: &ResumeDocument) -> String {
    let info = &doc.personal_info;
    let name = if info.full_name.is_empty() {
        crate::render::NAME_PLACEHOLDER
    } else {
        info.full_name.as_str()
    };

    let mut b = Builder { out: String::new() };
    b.out.push_str(
        "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
         xmlns:w=\"urn:schemas-microsoft-com:office:word\" \
         xmlns=\"http://www.w3.org/TR/REC-html40\">\n",
    );
    b.out.push_str(&format!(
        "<head><meta charset=\"utf-8\"><title>{}</title><style>{DOC_CSS}</style></head>\n<body>\n",
        e(name)
    ));

    let contact = join_nonempty(
        &[
            &info.email,
            &info.phone,
            &info.location,
            &info.linkedin,
            &info.portfolio,
        ],
        " | ",
    );
    b.out.push_str(&format!(
        "<div class=\"header\"><h1>{}</h1><p class=\"contact\">{}</p></div>\n",
        e(name),
        e(&contact)
    ));

    if !doc.career_objective.is_empty() {
        b.section("summary", "Professional Summary", |out| {
            out.push_str(&format!("<p>{}</p>", e(&doc.career_objective)));
        });
    }

    let skills = split_list(&doc.skills);
    if !skills.is_empty() {
        b.section("skills", "Skills", |out| {
            out.push_str(&format!("<p>{}</p>", e(&skills.join(", "))));
        });
    }

    if !doc.work_experience.is_empty() {
        b.section("experience", "Work Experience", |out| {
            for w in &doc.work_experience {
                let dates = date_range(&w.start_date, &w.end_date);
                entry(
                    out,
                    &w.job_title,
                    &join_nonempty(&[&w.company_name, &w.location], " - "),
                    dates.as_deref(),
                );
                let bullets: Vec<&String> =
                    w.responsibilities.iter().filter(|r| !r.trim().is_empty()).collect();
                if !bullets.is_empty() {
                    out.push_str("<ul>");
                    for r in bullets {
                        out.push_str(&format!("<li>{}</li>", e(r)));
                    }
                    out.push_str("</ul>");
                }
                out.push_str("</div>");
            }
        });
    }

    if !doc.education.is_empty() {
        b.section("education", "Education", |out| {
            for ed in &doc.education {
                let mut meta = format!("Graduated: {}", ed.graduation_year);
                if !ed.gpa.is_empty() {
                    meta.push_str(&format!(" - GPA: {}", ed.gpa));
                }
                entry(out, &ed.degree_title, &ed.university_name, Some(meta.as_str()));
                out.push_str("</div>");
            }
        });
    }

    if !doc.certifications.is_empty() {
        b.section("certifications", "Certifications", |out| {
            for c in &doc.certifications {
                entry(out, &c.name, &c.issued_by, Some(c.completion_date.as_str()));
                out.push_str("</div>");
            }
        });
    }

    if !doc.projects.is_empty() {
        b.section("projects", "Projects", |out| {
            for p in &doc.projects {
                entry(out, &p.title, &p.technologies, Some(p.link.as_str()));
                if !p.description.is_empty() {
                    out.push_str(&format!("<p>{}</p>", e(&p.description)));
                }
                out.push_str("</div>");
            }
        });
    }

    if !doc.awards.is_empty() {
        b.section("awards", "Awards", |out| {
            for a in &doc.awards {
                entry(out, &a.name, "", Some(a.date.as_str()));
                if !a.description.is_empty() {
                    out.push_str(&format!("<p>{}</p>", e(&a.description)));
                }
                out.push_str("</div>");
            }
        });
    }

    if !doc.languages.is_empty() {
        b.section("languages", "Languages", |out| {
            out.push_str("<ul>");
            for l in &doc.languages {
                let line = join_nonempty(&[&l.language, &l.proficiency], " - ");
                out.push_str(&format!("<li>{}</li>", e(&line)));
            }
            out.push_str("</ul>");
        });
    }

    let keywords = split_list(&doc.keywords);
    if !keywords.is_empty() {
        b.section("keywords", "Keywords", |out| {
            out.push_str(&format!("<p>{}</p>", e(&keywords.join(", "))));
        });
    }

    if doc.additional_options.add_cover_letter {
        b.section("cover-letter", "Cover Letter", |out| {
            out.push_str(&format!("<p><i>{COVER_LETTER_PLACEHOLDER}</i></p>"));
        });
    }

    b.out.push_str("</body>\n</html>\n");
    b.out
}
