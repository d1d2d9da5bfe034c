//! Export encoder: turns the current document into a downloadable file.
//!
//! - `PDF`: the preview surface is captured to a bitmap (controls hidden) and
//!   wrapped in a single A4 page.
//! - `DOCX`: the document is re-rendered as Word-compatible markup.

pub mod glyphs;
pub mod handlers;
pub mod markup;
pub mod pdf;
pub mod raster;
pub mod surface;

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use thiserror::Error;
use tracing::info;

use crate::models::resume::{ExportFormat, ResumeDocument};

pub use raster::{Bitmap, GlyphRasterizer, SurfaceCapture};
pub use surface::PreviewSurface;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Resume preview is not available for capture")]
    MissingRenderTarget,

    #[error("Failed to capture resume preview: {0}")]
    Capture(String),
}

/// A finished export, ready to hand to the client.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

/// Lowercases and keeps only `[a-z0-9]`; `"resume"` when nothing is left.
pub fn slug(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    if slug.is_empty() {
        "resume".to_string()
    } else {
        slug
    }
}

pub fn export_filename(full_name: &str, format: ExportFormat) -> String {
    let ext = match format {
        ExportFormat::Pdf => "pdf",
        ExportFormat::Docx => "doc",
    };
    format!("{}_resume.{ext}", slug(full_name))
}

#[derive(Clone)]
pub struct Exporter {
    capture: Arc<dyn SurfaceCapture>,
}

impl Exporter {
    pub fn new(capture: Arc<dyn SurfaceCapture>) -> Self {
        Self { capture }
    }

    /// Exports in the document's selected format.
    ///
    /// `surface` is the current preview; only the PDF path needs it.
    pub async fn export(
        &self,
        doc: &ResumeDocument,
        surface: Option<Arc<PreviewSurface>>,
    ) -> Result<ExportArtifact, ExportError> {
        let artifact = match doc.additional_options.export_format {
            ExportFormat::Pdf => self.export_pdf(doc, surface).await?,
            ExportFormat::Docx => export_markup(doc),
        };
        info!(
            filename = %artifact.filename,
            size = artifact.bytes.len(),
            "Export complete"
        );
        Ok(artifact)
    }

    pub async fn export_pdf(
        &self,
        doc: &ResumeDocument,
        surface: Option<Arc<PreviewSurface>>,
    ) -> Result<ExportArtifact, ExportError> {
        let surface = surface.ok_or(ExportError::MissingRenderTarget)?;

        let bitmap = {
            let _hidden = surface.hide_controls();
            self.capture.capture(Arc::clone(&surface)).await?
        };

        let full_name = &doc.personal_info.full_name;
        let title = if full_name.is_empty() { "Resume" } else { full_name.as_str() };
        let bytes = pdf::encode_pdf(&bitmap, title, Utc::now());
        Ok(ExportArtifact {
            filename: export_filename(full_name, ExportFormat::Pdf),
            content_type: "application/pdf",
            bytes: Bytes::from(bytes),
        })
    }
}

pub fn export_markup(doc: &ResumeDocument) -> ExportArtifact {
    ExportArtifact {
        filename: export_filename(&doc.personal_info.full_name, ExportFormat::Docx),
        content_type: "application/msword",
        bytes: Bytes::from(markup::render_markup(doc)),
    }
}
