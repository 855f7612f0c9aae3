//! Editor session and collaborative sync plumbing.
//!
//! - [`session`] owns the document buffer, cursor, and decoration view,
//!   and is the host's single entry point
//! - [`delta`] is the JSON wire vocabulary shared by inbound remote ops
//!   and the outbound local-change callback
//! - [`error`] is the failure taxonomy for both
//!
//! Remote applies run under an echo guard: they mutate the document
//! without replaying through the local-change callback. Everything is
//! synchronous and single-threaded.

pub mod delta;
pub mod error;
pub mod session;

pub use delta::{DeltaOp, parse_batch, parse_op};
pub use error::RemoteError;
pub use session::{EditorSession, EditorStats};

// The core crate's cursor reveal and decoration types are part of this
// crate's API surface.
pub use veil_editor_core::{
    CursorState, Decoration, DecorationKind, DecorationSet, EditInfo, ResolveConfig, SyntaxNode,
    SyntaxProvider, TreeError, UpdateSummary, Viewport, WidgetPayload, WidgetRenderer,
};
