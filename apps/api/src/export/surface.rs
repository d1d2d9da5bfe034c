use std::sync::atomic::{AtomicBool, Ordering};

use crate::render::{render_preview_html, RenderedResume};

/// The rendered preview a PDF export captures.
///
/// Owns the last projection plus the visibility of preview-only controls
/// (the template badge). Capture hides the controls through
/// [`PreviewSurface::hide_controls`] and they come back when the guard drops.
#[derive(Debug)]
pub struct PreviewSurface {
    resume: RenderedResume,
    controls_visible: AtomicBool,
}

impl PreviewSurface {
    pub fn new(resume: RenderedResume) -> Self {
        Self {
            resume,
            controls_visible: AtomicBool::new(true),
        }
    }

    pub fn resume(&self) -> &RenderedResume {
        &self.resume
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible.load(Ordering::SeqCst)
    }

    /// The badge as currently displayed, or `None` while hidden.
    pub fn visible_badge(&self) -> Option<&str> {
        self.controls_visible().then_some(self.resume.badge.as_str())
    }

    pub fn to_html(&self) -> String {
        render_preview_html(&self.resume, self.controls_visible())
    }

    /// Hides preview-only controls until the returned guard is dropped.
    pub fn hide_controls(&self) -> ControlsHidden<'_> {
        let was_visible = self.controls_visible.swap(false, Ordering::SeqCst);
        ControlsHidden {
            surface: self,
            was_visible,
        }
    }
}

/// Restores preview-only controls on drop.
#[must_use = "controls are restored as soon as the guard is dropped"]
pub struct ControlsHidden<'a> {
    surface: &'a PreviewSurface,
    was_visible: bool,
}

impl Drop for ControlsHidden<'_> {
    fn drop(&mut self) {
        if self.was_visible {
            self.surface.controls_visible.store(true, Ordering::SeqCst);
        }
    }
}
