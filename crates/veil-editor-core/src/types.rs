//! Core editor types: cursor, viewport, and transaction summaries.
//!
//! These types are framework-agnostic and can be used with any text buffer
//! implementation. All offsets are char offsets (Unicode scalar values).

use std::ops::Range;
use web_time::Instant;

/// Cursor state for decoration decisions.
///
/// Only the primary selection head matters for show/hide decisions;
/// multi-selection rendering is the host's concern.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct CursorState {
    /// Character offset in text (NOT byte offset!)
    pub head: usize,
}

impl CursorState {
    /// Create a new cursor at the given offset.
    pub fn new(head: usize) -> Self {
        Self { head }
    }

    /// Check if the cursor is within a range, inclusive on both ends.
    ///
    /// Structured tokens and syntax marks use this "edit window" test:
    /// a cursor sitting exactly on either delimiter keeps the source visible.
    pub fn in_range(&self, range: &Range<usize>) -> bool {
        self.head >= range.start && self.head <= range.end
    }
}

/// The visible window of the document, in char offsets.
///
/// Tree and line passes are scoped to it; constructs whose extent cannot be
/// locally bounded (frontmatter, tables, fences) are found by full-document
/// scans regardless.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub from: usize,
    pub to: usize,
}

impl Viewport {
    /// Create a viewport over the given char range.
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Viewport covering a whole document of `len` chars.
    pub fn full(len: usize) -> Self {
        Self { from: 0, to: len }
    }

    /// Check if a range intersects the viewport (half-open ranges).
    pub fn intersects(&self, range: &Range<usize>) -> bool {
        range.start < self.to && range.end > self.from
    }
}

/// What changed in the transaction that is being processed.
///
/// This is the input to the recompute trigger: decorations are re-derived
/// when any flag is set and the previous set is reused otherwise.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct UpdateSummary {
    /// The document text changed.
    pub doc_changed: bool,
    /// The cursor / primary selection head moved.
    pub selection_changed: bool,
    /// The visible window scrolled or resized.
    pub viewport_changed: bool,
}

impl UpdateSummary {
    /// Check if any recompute-relevant change happened.
    pub fn any(&self) -> bool {
        self.doc_changed || self.selection_changed || self.viewport_changed
    }

    /// Summary for a pure text edit.
    pub fn doc() -> Self {
        Self {
            doc_changed: true,
            ..Self::default()
        }
    }

    /// Summary for a cursor move.
    pub fn selection() -> Self {
        Self {
            selection_changed: true,
            ..Self::default()
        }
    }

    /// Summary for a scroll.
    pub fn viewport() -> Self {
        Self {
            viewport_changed: true,
            ..Self::default()
        }
    }
}

/// Record of the most recent buffer mutation.
///
/// Hosts use this to scope re-rendering after an edit: an edit with no
/// newline leaves line structure intact, and a record whose `doc_len_after`
/// no longer matches the buffer is from a previous cycle and must be ignored.
#[derive(Clone, Copy, Debug)]
pub struct EditInfo {
    /// Character offset where the edit occurred
    pub edit_char_pos: usize,
    /// Number of characters inserted
    pub inserted_len: usize,
    /// Number of characters deleted
    pub deleted_len: usize,
    /// Whether the edit added or removed a newline (line structure changed)
    pub contains_newline: bool,
    /// Document length (in chars) after this edit was applied.
    pub doc_len_after: usize,
    /// When this edit occurred.
    pub timestamp: Instant,
}

impl PartialEq for EditInfo {
    fn eq(&self, other: &Self) -> bool {
        // Compare all fields except timestamp (not meaningful for equality)
        self.edit_char_pos == other.edit_char_pos
            && self.inserted_len == other.inserted_len
            && self.deleted_len == other.deleted_len
            && self.contains_newline == other.contains_newline
            && self.doc_len_after == other.doc_len_after
    }
}

impl EditInfo {
    /// Check if this edit info is stale (doc has changed since this edit).
    pub fn is_stale(&self, current_doc_len: usize) -> bool {
        self.doc_len_after != current_doc_len
    }

    /// Get the range occupied by the inserted text.
    ///
    /// For pure deletions this is an empty range at the deletion point.
    pub fn affected_range(&self) -> Range<usize> {
        self.edit_char_pos..self.edit_char_pos + self.inserted_len
    }
}
