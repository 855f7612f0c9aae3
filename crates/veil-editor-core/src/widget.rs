//! Widget payloads.
//!
//! A replace decoration carries everything the host needs to draw the
//! widget, as plain data. No factory here touches a DOM, a canvas, or any
//! other host surface; [`WidgetRenderer`] is the seam where a host turns a
//! payload into its own representation.

use smol_str::SmolStr;

use crate::scan::TableData;

/// Data behind one replace decoration.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetPayload {
    /// Rendered formula; `display` picks block layout over inline.
    Math { source: SmolStr, display: bool },
    /// Rendered table, cells pre-split and trimmed.
    Table(TableData),
    /// Diagram source for the host's grammar renderer.
    Diagram { source: SmolStr },
    /// Collapsed frontmatter, raw YAML text included for the expanded view.
    FrontmatterBlock { source: SmolStr },
    Image { url: SmolStr, title: SmolStr },
    /// Clickable checkbox; `pos` is the start of the `[ ]` marker so the
    /// host can route a toggle back into the document.
    Checkbox { checked: bool, pos: usize },
    /// List bullet ornament; `number` is present for ordered markers.
    ListBullet { ordered: bool, number: Option<u32> },
    /// Zero-width toolbar anchor on a code block's first line, with the
    /// content range its copy action should grab.
    CodeToolbar {
        language: SmolStr,
        content_from: usize,
        content_to: usize,
    },
}

impl WidgetPayload {
    /// Stable payload class, usable as a CSS hook or a metrics label.
    pub fn kind_name(&self) -> &'static str {
        match self {
            WidgetPayload::Math { .. } => "math",
            WidgetPayload::Table(_) => "table",
            WidgetPayload::Diagram { .. } => "diagram",
            WidgetPayload::FrontmatterBlock { .. } => "frontmatter",
            WidgetPayload::Image { .. } => "image",
            WidgetPayload::Checkbox { .. } => "checkbox",
            WidgetPayload::ListBullet { .. } => "list-bullet",
            WidgetPayload::CodeToolbar { .. } => "code-toolbar",
        }
    }
}

/// Host-side widget materializer.
///
/// `None` means the host has no rendering for the payload and the range
/// should fall back to plain text.
pub trait WidgetRenderer {
    fn render_widget(&self, payload: &WidgetPayload) -> Option<String>;
}

/// No renderer; every widget falls back to plain text.
impl WidgetRenderer for () {
    fn render_widget(&self, _payload: &WidgetPayload) -> Option<String> {
        None
    }
}

impl<T: WidgetRenderer> WidgetRenderer for &T {
    fn render_widget(&self, payload: &WidgetPayload) -> Option<String> {
        (*self).render_widget(payload)
    }
}

impl<T: WidgetRenderer> WidgetRenderer for Option<T> {
    fn render_widget(&self, payload: &WidgetPayload) -> Option<String> {
        self.as_ref().and_then(|r| r.render_widget(payload))
    }
}
