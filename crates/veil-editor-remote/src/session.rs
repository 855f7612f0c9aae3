//! Editor session: one document, one cursor, one decoration view.
//!
//! The session owns the buffer and funnels every mutation through a
//! single apply path. Local edits go out through the local-change
//! callback as a JSON delta batch; remote applies run under an echo
//! guard so the same callback never replays them back to the server.
//! Everything here is synchronous and single-threaded.

use std::cell::Cell;
use std::ops::Range;
use std::rc::Rc;

use veil_editor_core::{
    CursorState, DecorationSet, EditInfo, EditorRope, ResolveConfig, SyntaxProvider, TextBuffer,
    UpdateSummary, ViewState, Viewport,
};
use web_time::Instant;

use crate::delta::DeltaOp;
use crate::error::RemoteError;

/// Document counters reported to the host chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct EditorStats {
    pub chars: usize,
    pub words: usize,
    pub lines: usize,
}

/// Restores the previous suppression state on drop, so an error path
/// cannot leave the session deaf to its own edits.
struct EchoGuard {
    flag: Rc<Cell<bool>>,
    prev: bool,
}

impl EchoGuard {
    fn engage(flag: &Rc<Cell<bool>>) -> Self {
        let flag = Rc::clone(flag);
        let prev = flag.replace(true);
        Self { flag, prev }
    }
}

impl Drop for EchoGuard {
    fn drop(&mut self) {
        self.flag.set(self.prev);
    }
}

pub struct EditorSession {
    buffer: EditorRope,
    cursor: CursorState,
    viewport: Viewport,
    view: ViewState,
    read_only: bool,
    suppress_echo: Rc<Cell<bool>>,
    on_local_change: Option<Box<dyn FnMut(&str)>>,
    doc_dirty: bool,
    selection_dirty: bool,
    viewport_dirty: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self {
            buffer: EditorRope::new(),
            cursor: CursorState::default(),
            viewport: Viewport::full(0),
            view: ViewState::default(),
            read_only: false,
            suppress_echo: Rc::new(Cell::new(false)),
            on_local_change: None,
            doc_dirty: true,
            selection_dirty: false,
            viewport_dirty: false,
        }
    }

    pub fn with_content(mut self, text: &str) -> Self {
        self.buffer = EditorRope::from(text);
        self.viewport = Viewport::full(self.buffer.len_chars());
        self.doc_dirty = true;
        self
    }

    pub fn with_config(mut self, config: ResolveConfig) -> Self {
        self.view = ViewState::new(config);
        self
    }

    /// Register the callback that receives local edits as a JSON delta
    /// batch, ready to forward to the sync transport.
    pub fn set_on_local_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_local_change = Some(Box::new(callback));
    }

    /// Full document text.
    pub fn content(&self) -> String {
        self.buffer.to_string()
    }

    pub fn stats(&self) -> EditorStats {
        let text = self.buffer.to_string();
        EditorStats {
            chars: self.buffer.len_chars(),
            words: text.split_whitespace().count(),
            lines: self.buffer.len_lines(),
        }
    }

    /// Shape of the most recent mutation, local or remote. A remote batch
    /// reports as one combined record.
    pub fn last_edit(&self) -> Option<EditInfo> {
        self.buffer.last_edit()
    }

    pub fn cursor(&self) -> CursorState {
        self.cursor
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Read-only gates local edits only; the server keeps syncing.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn set_cursor(&mut self, head: usize) {
        let head = head.min(self.buffer.len_chars());
        if head != self.cursor.head {
            self.cursor = CursorState::new(head);
            self.selection_dirty = true;
        }
    }

    pub fn set_viewport(&mut self, from: usize, to: usize) {
        let viewport = Viewport::new(from, to);
        if viewport != self.viewport {
            self.viewport = viewport;
            self.viewport_dirty = true;
        }
    }

    /// Move the cursor to the start of a 1-based line, clamping out-of-range
    /// requests to the first or last line. Returns the char offset so the
    /// host can scroll it into view.
    pub fn scroll_to_line(&mut self, line: usize) -> usize {
        let clamped = line.clamp(1, self.buffer.len_lines());
        let offset = self.buffer.line_to_char(clamped - 1);
        self.set_cursor(offset);
        offset
    }

    /// Apply a local edit: replace `range` with `text`.
    ///
    /// The cursor lands at the end of the inserted text and the edit goes
    /// out through the local-change callback.
    pub fn edit(&mut self, range: Range<usize>, text: &str) -> Result<(), RemoteError> {
        if self.read_only {
            return Err(RemoteError::ReadOnly);
        }
        self.apply_edit(range.clone(), text)?;
        self.cursor = CursorState::new(range.start + text.chars().count());
        self.selection_dirty = true;
        Ok(())
    }

    /// Replace the whole document with server-provided content.
    pub fn apply_remote_content(&mut self, text: &str) -> Result<(), RemoteError> {
        let _guard = EchoGuard::engage(&self.suppress_echo);
        let len = self.buffer.len_chars();
        self.apply_edit(0..len, text)?;

        let len = self.buffer.len_chars();
        if self.cursor.head > len {
            self.cursor = CursorState::new(len);
            self.selection_dirty = true;
        }
        tracing::debug!(target: "veil::remote", chars = len, "replaced document from remote");
        Ok(())
    }

    /// Apply one remote operation. The local cursor is mapped through the
    /// change instead of jumping to it.
    pub fn apply_remote_op(&mut self, op: &DeltaOp) -> Result<(), RemoteError> {
        let _guard = EchoGuard::engage(&self.suppress_echo);
        self.apply_remote(op)
    }

    /// Apply a remote batch atomically: every op is validated against the
    /// evolving document length first, and a bad batch leaves the document
    /// untouched. Applying in one pass also keeps a long catch-up batch
    /// linear instead of one dispatch per op.
    pub fn apply_remote_batch(&mut self, ops: &[DeltaOp]) -> Result<(), RemoteError> {
        let mut sim_len = self.buffer.len_chars();
        for op in ops {
            match op {
                DeltaOp::Insert { pos, content } => {
                    if *pos > sim_len {
                        return Err(RemoteError::OutOfRange {
                            pos: *pos,
                            len: 0,
                            doc_len: sim_len,
                        });
                    }
                    sim_len += content.chars().count();
                }
                DeltaOp::Delete { pos, len } => {
                    let end = delete_end(*pos, *len, sim_len)?;
                    if end > sim_len {
                        return Err(RemoteError::OutOfRange {
                            pos: *pos,
                            len: *len,
                            doc_len: sim_len,
                        });
                    }
                    sim_len -= len;
                }
            }
        }

        let _guard = EchoGuard::engage(&self.suppress_echo);
        let mut first_pos = usize::MAX;
        let mut inserted_total = 0;
        let mut deleted_total = 0;
        let mut contains_newline = false;
        for op in ops {
            match op {
                DeltaOp::Insert { pos, content } => {
                    first_pos = first_pos.min(*pos);
                    inserted_total += content.chars().count();
                    contains_newline |= content.contains('\n');
                }
                DeltaOp::Delete { pos, len } => {
                    first_pos = first_pos.min(*pos);
                    deleted_total += *len;
                    let end = delete_end(*pos, *len, self.buffer.len_chars())?;
                    contains_newline |= self
                        .buffer
                        .slice(*pos..end)
                        .map(|s| s.contains('\n'))
                        .unwrap_or(false);
                }
            }
            self.apply_remote(op)?;
        }

        // The per-op records are an implementation detail; the batch is one
        // edit as far as any consumer is concerned.
        if !ops.is_empty() {
            self.buffer.set_last_edit(Some(EditInfo {
                edit_char_pos: first_pos,
                inserted_len: inserted_total,
                deleted_len: deleted_total,
                contains_newline,
                doc_len_after: self.buffer.len_chars(),
                timestamp: Instant::now(),
            }));
        }
        tracing::debug!(target: "veil::remote", ops = ops.len(), "applied remote batch");
        Ok(())
    }

    /// Parse-and-apply conveniences for hosts that hand the JSON straight
    /// through.
    pub fn apply_remote_op_json(&mut self, json: &str) -> Result<(), RemoteError> {
        let op = crate::delta::parse_op(json)?;
        self.apply_remote_op(&op)
    }

    pub fn apply_remote_batch_json(&mut self, json: &str) -> Result<(), RemoteError> {
        let ops = crate::delta::parse_batch(json)?;
        self.apply_remote_batch(&ops)
    }

    /// Decorations for the current frame. Recomputes only when something
    /// changed since the last call.
    pub fn decorations<P: SyntaxProvider>(&mut self, provider: P) -> &DecorationSet {
        let summary = UpdateSummary {
            doc_changed: self.doc_dirty,
            selection_changed: self.selection_dirty,
            viewport_changed: self.viewport_dirty,
        };
        self.doc_dirty = false;
        self.selection_dirty = false;
        self.viewport_dirty = false;

        let text = self.buffer.to_string();
        self.view
            .update(&text, &self.cursor, &self.viewport, &summary, provider)
    }

    fn apply_remote(&mut self, op: &DeltaOp) -> Result<(), RemoteError> {
        let (from, removed, inserted) = match op {
            DeltaOp::Insert { pos, content } => (*pos, 0, content.chars().count()),
            DeltaOp::Delete { pos, len } => (*pos, *len, 0),
        };
        match op {
            DeltaOp::Insert { pos, content } => self.apply_edit(*pos..*pos, content)?,
            DeltaOp::Delete { pos, len } => {
                let end = delete_end(*pos, *len, self.buffer.len_chars())?;
                self.apply_edit(*pos..end, "")?;
            }
        }

        let mapped = map_cursor(self.cursor.head, from, removed, inserted);
        if mapped != self.cursor.head {
            self.cursor = CursorState::new(mapped);
            self.selection_dirty = true;
        }
        Ok(())
    }

    /// The single mutation path. Validates, applies, and emits the delta
    /// callback unless an echo guard is engaged.
    fn apply_edit(&mut self, range: Range<usize>, text: &str) -> Result<(), RemoteError> {
        let doc_len = self.buffer.len_chars();
        if range.start > range.end || range.end > doc_len {
            return Err(RemoteError::OutOfRange {
                pos: range.start,
                len: range.end.saturating_sub(range.start),
                doc_len,
            });
        }

        let removed = range.end - range.start;
        if removed == 0 && text.is_empty() {
            return Ok(());
        }
        self.buffer.replace(range.clone(), text);
        self.doc_dirty = true;

        if !self.suppress_echo.get() {
            if let Some(callback) = self.on_local_change.as_mut() {
                let mut ops = Vec::with_capacity(2);
                if removed > 0 {
                    ops.push(DeltaOp::Delete {
                        pos: range.start,
                        len: removed,
                    });
                }
                if !text.is_empty() {
                    ops.push(DeltaOp::Insert {
                        pos: range.start,
                        content: text.into(),
                    });
                }
                let json = serde_json::to_string(&ops)?;
                callback(&json);
            }
        }
        Ok(())
    }
}

/// End offset of a wire delete. The values come off the network, so a
/// `pos`/`len` pair whose sum overflows is out of range by definition,
/// not a panic.
fn delete_end(pos: usize, len: usize, doc_len: usize) -> Result<usize, RemoteError> {
    pos.checked_add(len)
        .ok_or(RemoteError::OutOfRange { pos, len, doc_len })
}

/// Map a cursor through a replacement of `[from, from + removed)` by
/// `inserted` chars. A cursor inside the removed span collapses to its
/// start; an insertion exactly at the cursor stays after it.
fn map_cursor(head: usize, from: usize, removed: usize, inserted: usize) -> usize {
    if head <= from {
        head
    } else if head >= from + removed {
        head - removed + inserted
    } else {
        from
    }
}
