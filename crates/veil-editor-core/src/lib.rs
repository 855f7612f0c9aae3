//! Core engine for hybrid source/preview markdown editing.
//!
//! The pipeline per frame:
//!
//! - [`scan`] tokenizes structured constructs (math, tables, diagrams,
//!   frontmatter, images) straight off the document text
//! - [`syntax`] is the seam where a host parse tree contributes named
//!   marker nodes
//! - [`resolver`] folds tokens, nodes, and per-line analysis into a
//!   [`DecorationSet`], deciding what the cursor reveals
//! - [`view`] caches the resolved set and skips recomputation for
//!   irrelevant updates
//!
//! All offsets everywhere are char offsets (Unicode scalar values),
//! never bytes.

pub mod decoration;
pub mod resolver;
pub mod scan;
pub mod syntax;
pub mod text;
pub mod types;
pub mod view;
pub mod widget;

pub use decoration::{
    Decoration, DecorationKind, DecorationSet, PRIORITY_LINE, PRIORITY_TOKEN, PRIORITY_TREE,
};
pub use resolver::{ResolveConfig, resolve};
pub use scan::{
    Alignment, FencedRegion, InlineNode, ScanResult, TableData, Token, TokenKind, parse_inline,
    scan_document,
};
pub use syntax::{SyntaxNode, SyntaxProvider, TreeError};
pub use text::{EditorRope, TextBuffer};
pub use types::{CursorState, EditInfo, UpdateSummary, Viewport};
pub use view::{ViewState, needs_recompute};
pub use widget::{WidgetPayload, WidgetRenderer};

// Re-export so downstream crates don't need a direct dependency for the
// string type in our public API.
pub use smol_str::SmolStr;
