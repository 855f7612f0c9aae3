//! Syntax tree collaborator seam.
//!
//! The resolver does not parse markdown structure itself; a host-side
//! parse tree supplies named marker nodes (header hashes, emphasis stars,
//! link brackets) through [`SyntaxProvider`]. The engine stays agnostic
//! about where that tree comes from.

use std::ops::Range;

use smol_str::SmolStr;
use thiserror::Error;

/// Node names the resolver reacts to. A provider is free to emit others;
/// they are ignored.
pub mod node {
    pub const HEADER_MARK: &str = "HeaderMark";
    pub const EMPHASIS_MARK: &str = "EmphasisMark";
    pub const CODE_MARK: &str = "CodeMark";
    pub const LINK_MARK: &str = "LinkMark";
    pub const QUOTE_MARK: &str = "QuoteMark";
    pub const LIST_MARK: &str = "ListMark";
    pub const TASK_MARKER: &str = "TaskMarker";
    pub const INLINE_CODE: &str = "InlineCode";
    pub const FRONTMATTER: &str = "Frontmatter";
}

/// One node reported by the host tree, flattened.
///
/// `parent_range` is the span of the enclosing construct (the whole heading
/// for a `HeaderMark`, the whole emphasis for an `EmphasisMark`); marker
/// hiding keys off the parent so the markers reappear the moment the cursor
/// enters any part of the construct.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub name: SmolStr,
    pub range: Range<usize>,
    pub parent_range: Option<Range<usize>>,
}

impl SyntaxNode {
    pub fn new(name: impl Into<SmolStr>, range: Range<usize>) -> Self {
        Self {
            name: name.into(),
            range,
            parent_range: None,
        }
    }

    pub fn with_parent(
        name: impl Into<SmolStr>,
        range: Range<usize>,
        parent_range: Range<usize>,
    ) -> Self {
        Self {
            name: name.into(),
            range,
            parent_range: Some(parent_range),
        }
    }

    /// Range that decides whether the cursor "touches" this node: the
    /// parent construct when known, the node itself otherwise.
    pub fn visibility_range(&self) -> &Range<usize> {
        self.parent_range.as_ref().unwrap_or(&self.range)
    }

    /// Whether a cursor position touches this node, inclusive at both ends
    /// so a cursor sitting just past the construct still reveals it.
    pub fn cursor_in_range(&self, pos: usize) -> bool {
        let range = self.visibility_range();
        pos >= range.start && pos <= range.end
    }
}

/// The host tree could not be walked.
#[derive(Debug, Error)]
#[error("syntax tree walk failed: {0}")]
pub struct TreeError(pub String);

/// Source of flattened syntax nodes for a document range.
///
/// Implementations must report nodes in document order. Errors degrade the
/// render (structure decorations are skipped for the frame) rather than
/// failing it.
pub trait SyntaxProvider {
    fn nodes_in(&self, text: &str, range: Range<usize>) -> Result<Vec<SyntaxNode>, TreeError>;
}

/// No tree available; structure decorations are skipped.
impl SyntaxProvider for () {
    fn nodes_in(&self, _text: &str, _range: Range<usize>) -> Result<Vec<SyntaxNode>, TreeError> {
        Ok(Vec::new())
    }
}

impl<T: SyntaxProvider> SyntaxProvider for &T {
    fn nodes_in(&self, text: &str, range: Range<usize>) -> Result<Vec<SyntaxNode>, TreeError> {
        (*self).nodes_in(text, range)
    }
}

impl<T: SyntaxProvider> SyntaxProvider for Option<T> {
    fn nodes_in(&self, text: &str, range: Range<usize>) -> Result<Vec<SyntaxNode>, TreeError> {
        match self {
            Some(provider) => provider.nodes_in(text, range),
            None => Ok(Vec::new()),
        }
    }
}
