//! Capture of the preview surface into a grayscale bitmap.
//!
//! Layout happens in page units (one unit per PDF point at scale 1) and is
//! painted at `scale` pixels per unit. Painting is CPU-bound and runs on the
//! blocking pool. The canvas grows with the content up to `MAX_PAGES` page
//! heights; anything below that is cut off.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::render::{HeaderLayout, HeadingStyle, RenderedItem, SectionBody};

use super::glyphs::{self, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH, LINE_HEIGHT};
use super::surface::PreviewSurface;
use super::ExportError;

/// Canvas width in page units.
pub const PAGE_UNITS_WIDE: usize = 595;
/// Minimum canvas height in page units; keeps the A4 portrait ratio.
pub const PAGE_UNITS_TALL: usize = 842;
/// Upper bound on canvas height, in page heights.
pub const MAX_PAGES: usize = 8;

const MARGIN: usize = 36;
const INK: u8 = 0;
const MUTED: u8 = 96;
const PAPER: u8 = 255;

// ────────────────────────────────────────────────────────────────────────────
// Bitmap
// ────────────────────────────────────────────────────────────────────────────

/// 8-bit grayscale image, row-major, `0` is black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// A blank (white) bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![PAPER; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Fills a rectangle, clipped to the bitmap.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, shade: u8) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for row in y.min(y_end)..y_end {
            let start = row * self.width;
            self.pixels[start + x.min(x_end)..start + x_end].fill(shade);
        }
    }

    /// Count of non-white pixels.
    #[cfg(test)]
    pub fn ink(&self) -> usize {
        self.pixels.iter().filter(|p| **p != PAPER).count()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Capture seam
// ────────────────────────────────────────────────────────────────────────────

/// Turns the current preview surface into pixels.
#[async_trait]
pub trait SurfaceCapture: Send + Sync {
    async fn capture(&self, surface: Arc<PreviewSurface>) -> Result<Bitmap, ExportError>;
}

/// Draws the surface with the built-in bitmap font.
#[derive(Debug, Clone, Copy)]
pub struct GlyphRasterizer {
    scale: usize,
}

impl GlyphRasterizer {
    pub const DEFAULT_SCALE: usize = 2;

    pub fn new(scale: usize) -> Self {
        Self {
            scale: scale.max(1),
        }
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Synchronous capture. Reads the surface's control visibility at call time.
    pub fn rasterize(&self, surface: &PreviewSurface) -> Bitmap {
        let mut layout = Layout::default();
        layout.surface(surface);

        let needed = layout.y + MARGIN;
        let height_units = needed.clamp(PAGE_UNITS_TALL, PAGE_UNITS_TALL * MAX_PAGES);
        if needed > height_units {
            warn!(
                needed,
                kept = height_units,
                "Preview taller than the capture limit; truncating"
            );
        }

        let mut bitmap = Bitmap::new(PAGE_UNITS_WIDE * self.scale, height_units * self.scale);
        for op in layout.ops.iter().filter(|op| op.top() < height_units) {
            self.paint(&mut bitmap, op);
        }
        bitmap
    }

    fn paint(&self, bitmap: &mut Bitmap, op: &DrawOp) {
        let s = self.scale;
        match op {
            DrawOp::Rect { x, y, w, h, shade } => {
                bitmap.fill_rect(x * s, y * s, w * s, h * s, *shade)
            }
            DrawOp::Text { x, y, size, shade, text } => {
                let px = s * size;
                for (i, c) in text.chars().enumerate() {
                    let origin_x = (x + i * ADVANCE * size) * s;
                    for col in 0..GLYPH_WIDTH {
                        for row in 0..GLYPH_HEIGHT {
                            if glyphs::is_set(c, col, row) {
                                bitmap.fill_rect(
                                    origin_x + col * px,
                                    y * s + row * px,
                                    px,
                                    px,
                                    *shade,
                                );
                            }
                        }
                    }
                }
            }
        }
    }
}

impl Default for GlyphRasterizer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SCALE)
    }
}

#[async_trait]
impl SurfaceCapture for GlyphRasterizer {
    async fn capture(&self, surface: Arc<PreviewSurface>) -> Result<Bitmap, ExportError> {
        let rasterizer = *self;
        let bitmap = tokio::task::spawn_blocking(move || rasterizer.rasterize(&surface))
            .await
            .map_err(|e| ExportError::Capture(format!("rasterizer task failed: {e}")))?;
        debug!(
            width = bitmap.width(),
            height = bitmap.height(),
            "Captured preview surface"
        );
        Ok(bitmap)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum DrawOp {
    Text {
        x: usize,
        y: usize,
        size: usize,
        shade: u8,
        text: String,
    },
    Rect {
        x: usize,
        y: usize,
        w: usize,
        h: usize,
        shade: u8,
    },
}

impl DrawOp {
    fn top(&self) -> usize {
        match self {
            DrawOp::Text { y, .. } | DrawOp::Rect { y, .. } => *y,
        }
    }
}

#[derive(Default)]
struct Layout {
    ops: Vec<DrawOp>,
    /// Next free line, in page units.
    y: usize,
}

const CONTENT_WIDTH: usize = PAGE_UNITS_WIDE - 2 * MARGIN;
const NAME_SIZE: usize = 2;

impl Layout {
    fn surface(&mut self, surface: &PreviewSurface) {
        let resume = surface.resume();
        self.y = MARGIN;
        self.header(&resume.header.name, &resume.header.contact, resume.header.layout);

        for section in &resume.sections {
            self.y += LINE_HEIGHT / 2;
            self.heading(&section.title, resume.heading_style);
            match &section.body {
                SectionBody::Paragraph(text) => self.wrapped(MARGIN, CONTENT_WIDTH, text, INK),
                SectionBody::Chips(chips) => self.chips(chips),
                SectionBody::Items(items) => {
                    for item in items {
                        self.item(item);
                    }
                }
            }
        }

        if let Some(badge) = surface.visible_badge() {
            self.y += LINE_HEIGHT;
            self.centered(badge, 1, MUTED);
        }
    }

    fn text(&mut self, x: usize, text: &str, size: usize, shade: u8) {
        self.ops.push(DrawOp::Text {
            x,
            y: self.y,
            size,
            shade,
            text: text.to_string(),
        });
    }

    fn rule(&mut self, x: usize, w: usize, h: usize) {
        self.ops.push(DrawOp::Rect {
            x,
            y: self.y,
            w,
            h,
            shade: INK,
        });
    }

    fn centered(&mut self, text: &str, size: usize, shade: u8) {
        for line in wrap(text, CONTENT_WIDTH / (ADVANCE * size)) {
            let width = glyphs::text_width(&line) * size;
            let x = MARGIN + CONTENT_WIDTH.saturating_sub(width) / 2;
            self.text(x, &line, size, shade);
            self.y += LINE_HEIGHT * size;
        }
    }

    fn wrapped(&mut self, x: usize, width: usize, text: &str, shade: u8) {
        for line in wrap(text, width / ADVANCE) {
            self.text(x, &line, 1, shade);
            self.y += LINE_HEIGHT;
        }
    }

    fn header(&mut self, name: &str, contact: &[String], layout: HeaderLayout) {
        match layout {
            HeaderLayout::Centered => {
                self.centered(name, NAME_SIZE, INK);
                self.centered(&contact.join(" | "), 1, MUTED);
            }
            HeaderLayout::Ruled => {
                self.centered(name, NAME_SIZE, INK);
                self.rule(MARGIN, CONTENT_WIDTH, 2);
                self.y += 4;
                self.centered(&contact.join(" | "), 1, MUTED);
            }
            HeaderLayout::Split => {
                let top = self.y;
                let name_width = CONTENT_WIDTH * 3 / 5;
                for line in wrap(name, name_width / (ADVANCE * NAME_SIZE)) {
                    self.text(MARGIN, &line, NAME_SIZE, INK);
                    self.y += LINE_HEIGHT * NAME_SIZE;
                }
                let name_bottom = self.y;

                self.y = top;
                let right_edge = MARGIN + CONTENT_WIDTH;
                let column = CONTENT_WIDTH - name_width;
                for item in contact {
                    for line in wrap(item, column / ADVANCE) {
                        let x = right_edge.saturating_sub(glyphs::text_width(&line));
                        self.text(x, &line, 1, MUTED);
                        self.y += LINE_HEIGHT;
                    }
                }
                self.y = self.y.max(name_bottom);
            }
        }
        self.y += LINE_HEIGHT / 2;
    }

    fn heading(&mut self, title: &str, style: HeadingStyle) {
        match style {
            HeadingStyle::Underlined => {
                self.text(MARGIN, title, 1, INK);
                self.y += GLYPH_HEIGHT + 2;
                self.rule(MARGIN, CONTENT_WIDTH, 1);
                self.y += 4;
            }
            HeadingStyle::AccentBar => {
                self.rule(MARGIN, 3, GLYPH_HEIGHT);
                self.text(MARGIN + 8, title, 1, INK);
                self.y += LINE_HEIGHT + 2;
            }
            HeadingStyle::SmallCapsRule => {
                self.text(MARGIN, &title.to_uppercase(), 1, INK);
                self.y += GLYPH_HEIGHT + 2;
                self.rule(MARGIN, CONTENT_WIDTH, 1);
                self.y += 4;
            }
        }
    }

    fn chips(&mut self, chips: &[String]) {
        const PAD: usize = 3;
        let mut x = MARGIN;
        for chip in chips {
            let chip = truncate(chip, (CONTENT_WIDTH - 2 * PAD) / ADVANCE);
            let w = glyphs::text_width(&chip) + 2 * PAD;
            if x > MARGIN && x + w > MARGIN + CONTENT_WIDTH {
                x = MARGIN;
                self.y += LINE_HEIGHT + 2 * PAD;
            }
            let h = GLYPH_HEIGHT + 2 * PAD;
            self.ops.push(DrawOp::Rect { x, y: self.y, w, h: 1, shade: MUTED });
            self.ops.push(DrawOp::Rect { x, y: self.y + h - 1, w, h: 1, shade: MUTED });
            self.ops.push(DrawOp::Rect { x, y: self.y, w: 1, h, shade: MUTED });
            self.ops.push(DrawOp::Rect { x: x + w - 1, y: self.y, w: 1, h, shade: MUTED });
            self.ops.push(DrawOp::Text {
                x: x + PAD,
                y: self.y + PAD,
                size: 1,
                shade: INK,
                text: chip,
            });
            x += w + PAD;
        }
        self.y += LINE_HEIGHT + 2 * PAD;
    }

    fn item(&mut self, item: &RenderedItem) {
        match (&item.meta, item.meta_inline) {
            (Some(meta), true) => {
                let meta_width = glyphs::text_width(meta);
                let title_room = CONTENT_WIDTH.saturating_sub(meta_width + ADVANCE);
                let top = self.y;
                self.wrapped(MARGIN, title_room.max(ADVANCE), &item.title, INK);
                let bottom = self.y;
                self.y = top;
                let x = (MARGIN + CONTENT_WIDTH).saturating_sub(meta_width).max(MARGIN);
                self.text(x, meta, 1, MUTED);
                self.y = bottom.max(top + LINE_HEIGHT);
            }
            _ => self.wrapped(MARGIN, CONTENT_WIDTH, &item.title, INK),
        }
        if let Some(subtitle) = &item.subtitle {
            self.wrapped(MARGIN, CONTENT_WIDTH, subtitle, MUTED);
        }
        if let (Some(meta), false) = (&item.meta, item.meta_inline) {
            self.wrapped(MARGIN, CONTENT_WIDTH, meta, MUTED);
        }
        for detail in &item.details {
            self.wrapped(MARGIN, CONTENT_WIDTH, detail, INK);
        }
        for bullet in &item.bullets {
            let indent = MARGIN + 2 * ADVANCE;
            self.text(MARGIN + ADVANCE / 2, "-", 1, INK);
            self.wrapped(indent, CONTENT_WIDTH - 2 * ADVANCE, bullet, INK);
        }
        self.y += LINE_HEIGHT / 2;
    }
}

/// Greedy word wrap to at most `max_chars` per line; long words are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut len = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if len > 0 {
                    lines.push(std::mem::take(&mut line));
                    len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if len == 0 { word.len() } else { len + 1 + word.len() };
            if needed > max_chars {
                lines.push(std::mem::take(&mut line));
                len = 0;
            }
            if len > 0 {
                line.push(' ');
                len += 1;
            }
            line.extend(word.iter());
            len += word.len();
        }
        if len > 0 {
            lines.push(line);
        }
    }
    lines
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ResumeDocument, Template, WorkExperienceEntry};
    use crate::render::project;

    fn surface_for(doc: &ResumeDocument, template: Template) -> PreviewSurface {
        PreviewSurface::new(project(doc, template))
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        assert_eq!(wrap("alpha beta gamma", 10), vec!["alpha beta", "gamma"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap("", 10).is_empty());
        assert_eq!(wrap("one\ntwo", 20), vec!["one", "two"]);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut bitmap = Bitmap::new(4, 4);
        bitmap.fill_rect(2, 2, 10, 10, 0);
        assert_eq!(bitmap.ink(), 4);
        assert_eq!(bitmap.get(3, 3), Some(0));
        assert_eq!(bitmap.get(4, 0), None);
    }

    #[test]
    fn test_minimum_canvas_keeps_a4_ratio() {
        let raster = GlyphRasterizer::new(2);
        let bitmap = raster.rasterize(&surface_for(&ResumeDocument::default(), Template::Modern));
        assert_eq!(bitmap.width(), PAGE_UNITS_WIDE * 2);
        assert_eq!(bitmap.height(), PAGE_UNITS_TALL * 2);
        assert!(bitmap.ink() > 0);
    }

    #[test]
    fn test_long_documents_grow_the_canvas() {
        let mut doc = ResumeDocument::default();
        for _ in 0..40 {
            doc.work_experience.push(WorkExperienceEntry {
                job_title: "Engineer".to_string(),
                responsibilities: vec!["Did a thing".to_string(); 3],
                ..Default::default()
            });
        }
        let bitmap = GlyphRasterizer::new(1).rasterize(&surface_for(&doc, Template::Classic));
        assert!(bitmap.height() > PAGE_UNITS_TALL);
    }

    #[test]
    fn test_huge_documents_are_capped() {
        let mut doc = ResumeDocument::default();
        doc.work_experience.push(WorkExperienceEntry {
            job_title: "Engineer".to_string(),
            responsibilities: vec!["x".to_string(); 20_000],
            ..Default::default()
        });
        let raster = GlyphRasterizer::new(2);
        let bitmap = raster.rasterize(&surface_for(&doc, Template::Modern));
        assert_eq!(bitmap.width(), PAGE_UNITS_WIDE * 2);
        assert_eq!(bitmap.height(), PAGE_UNITS_TALL * MAX_PAGES * 2);
        assert_eq!(bitmap.pixels().len(), bitmap.width() * bitmap.height());
        // Content runs all the way to the bottom edge.
        let last_row = (0..bitmap.height())
            .rev()
            .find(|&y| (0..bitmap.width()).any(|x| bitmap.get(x, y) != Some(PAPER)));
        assert!(last_row.unwrap() > bitmap.height() - PAGE_UNITS_TALL);
    }

    #[test]
    fn test_hidden_badge_is_not_drawn() {
        let surface = surface_for(&ResumeDocument::default(), Template::Minimal);
        let raster = GlyphRasterizer::new(1);
        let with_badge = raster.rasterize(&surface);
        let without = {
            let _hidden = surface.hide_controls();
            raster.rasterize(&surface)
        };
        assert!(with_badge.ink() > without.ink());
    }

    #[test]
    fn test_scale_zero_is_clamped() {
        assert_eq!(GlyphRasterizer::new(0).scale(), 1);
    }

    #[tokio::test]
    async fn test_capture_runs_off_thread() {
        let surface = Arc::new(surface_for(&ResumeDocument::default(), Template::Classic));
        let bitmap = GlyphRasterizer::default().capture(surface).await.unwrap();
        assert_eq!(bitmap.width(), PAGE_UNITS_WIDE * GlyphRasterizer::DEFAULT_SCALE);
    }
}
