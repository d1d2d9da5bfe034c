use super::{HeaderLayout, HeadingStyle, RenderedItem, RenderedResume, SectionBody};

/// Escapes `& < > " '` for safe inclusion in HTML text and attributes.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const PREVIEW_CSS: &str = r#"
body { background: #f3f4f6; margin: 0; font-family: Georgia, serif; }
.page { max-width: 210mm; min-height: 297mm; margin: 16px auto; padding: 32px; background: #fff; color: #1f2937; }
.header-centered, .header-ruled { text-align: center; }
.header-ruled h1 { border-bottom: 2px solid #1f2937; padding-bottom: 8px; }
.header-split { display: flex; justify-content: space-between; }
.header-split .contact { text-align: right; }
.contact { font-size: 12px; color: #4b5563; }
h2.underlined { border-bottom: 2px solid #d1d5db; }
h2.accent-bar { border-left: 4px solid #2563eb; padding-left: 8px; color: #2563eb; }
h2.small-caps-rule { text-transform: uppercase; letter-spacing: .08em; border-bottom: 1px solid #9ca3af; }
.item { margin-bottom: 12px; font-size: 13px; }
.item .title-line { display: flex; justify-content: space-between; }
.meta { color: #6b7280; }
.chip { display: inline-block; background: #dbeafe; color: #1d4ed8; border-radius: 999px; padding: 2px 8px; margin: 2px; font-size: 12px; }
.badge { text-align: center; font-size: 12px; color: #9ca3af; margin-top: 24px; }
@media print { .print-hide { display: none; } }
"#;

/// Renders the preview page for a projection.
///
/// The template badge carries the `print-hide` class and is omitted entirely
/// when `controls_visible` is false.
pub fn render_preview_html(resume: &RenderedResume, controls_visible: bool) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    out.push_str(&format!("<title>{}</title>", escape_html(&resume.header.name)));
    out.push_str(&format!("<style>{PREVIEW_CSS}</style></head><body><div class=\"page\">"));

    let header_class = match resume.header.layout {
        HeaderLayout::Centered => "header-centered",
        HeaderLayout::Ruled => "header-ruled",
        HeaderLayout::Split => "header-split",
    };
    out.push_str(&format!(
        "<header class=\"{header_class}\"><h1>{}</h1>",
        escape_html(&resume.header.name)
    ));
    let contact: Vec<String> = resume.header.contact.iter().map(|c| escape_html(c)).collect();
    match resume.header.layout {
        HeaderLayout::Split => {
            out.push_str("<div class=\"contact\">");
            for c in &contact {
                out.push_str(&format!("<p>{c}</p>"));
            }
            out.push_str("</div>");
        }
        _ => {
            out.push_str(&format!("<p class=\"contact\">{}</p>", contact.join(" | ")));
        }
    }
    out.push_str("</header>");

    let heading_class = match resume.heading_style {
        HeadingStyle::Underlined => "underlined",
        HeadingStyle::AccentBar => "accent-bar",
        HeadingStyle::SmallCapsRule => "small-caps-rule",
    };
    for section in &resume.sections {
        out.push_str(&format!(
            "<section><h2 class=\"{heading_class}\">{}</h2>",
            escape_html(&section.title)
        ));
        match &section.body {
            SectionBody::Paragraph(text) => {
                out.push_str(&format!("<p>{}</p>", escape_html(text)));
            }
            SectionBody::Chips(chips) => {
                out.push_str("<div>");
                for chip in chips {
                    out.push_str(&format!("<span class=\"chip\">{}</span>", escape_html(chip)));
                }
                out.push_str("</div>");
            }
            SectionBody::Items(items) => {
                for item in items {
                    write_item(&mut out, item);
                }
            }
        }
        out.push_str("</section>");
    }

    if controls_visible {
        out.push_str(&format!(
            "<p class=\"badge print-hide\">{}</p>",
            escape_html(&resume.badge)
        ));
    }
    out.push_str("</div></body></html>\n");
    out
}

fn write_item(out: &mut String, item: &RenderedItem) {
    out.push_str("<div class=\"item\">");
    match (&item.meta, item.meta_inline) {
        (Some(meta), true) => {
            out.push_str(&format!(
                "<div class=\"title-line\"><strong>{}</strong><span class=\"meta\">{}</span></div>",
                escape_html(&item.title),
                escape_html(meta)
            ));
        }
        _ => {
            out.push_str(&format!("<strong>{}</strong>", escape_html(&item.title)));
        }
    }
    if let Some(subtitle) = &item.subtitle {
        out.push_str(&format!("<p><em>{}</em></p>", escape_html(subtitle)));
    }
    if let (Some(meta), false) = (&item.meta, item.meta_inline) {
        out.push_str(&format!("<p class=\"meta\">{}</p>", escape_html(meta)));
    }
    for detail in &item.details {
        out.push_str(&format!("<p>{}</p>", escape_html(detail)));
    }
    if !item.bullets.is_empty() {
        out.push_str("<ul>");
        for bullet in &item.bullets {
            out.push_str(&format!("<li>{}</li>", escape_html(bullet)));
        }
        out.push_str("</ul>");
    }
    out.push_str("</div>");
}
