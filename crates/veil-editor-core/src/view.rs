//! Per-view decoration state and the recompute trigger.
//!
//! [`ViewState`] owns the last resolved [`DecorationSet`] and recomputes
//! it only when an update actually warrants it, so a burst of no-op
//! updates (focus changes, IME composition ticks) costs nothing.

use web_time::Instant;

use crate::decoration::DecorationSet;
use crate::resolver::{ResolveConfig, resolve};
use crate::syntax::SyntaxProvider;
use crate::types::{CursorState, UpdateSummary, Viewport};

/// Whether an update warrants recomputation: document edits, cursor
/// movement, and viewport scrolls all change what should be decorated.
pub fn needs_recompute(summary: &UpdateSummary) -> bool {
    summary.any()
}

/// Decoration state for one view of one document.
#[derive(Debug, Default)]
pub struct ViewState {
    config: ResolveConfig,
    decorations: DecorationSet,
    computed_once: bool,
}

impl ViewState {
    pub fn new(config: ResolveConfig) -> Self {
        Self {
            config,
            decorations: DecorationSet::default(),
            computed_once: false,
        }
    }

    pub fn config(&self) -> &ResolveConfig {
        &self.config
    }

    /// The set from the last computation, possibly stale.
    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    /// Recompute decorations if `summary` warrants it, otherwise hand back
    /// the cached set. The first call always computes.
    pub fn update<P: SyntaxProvider>(
        &mut self,
        text: &str,
        cursor: &CursorState,
        viewport: &Viewport,
        summary: &UpdateSummary,
        provider: P,
    ) -> &DecorationSet {
        if self.computed_once && !needs_recompute(summary) {
            tracing::trace!(
                target: "veil::view",
                "no relevant change, returning cached decorations"
            );
            return &self.decorations;
        }

        let started = Instant::now();
        self.decorations = resolve(text, cursor, viewport, provider, &self.config);
        self.computed_once = true;
        tracing::debug!(
            target: "veil::view",
            elapsed_us = started.elapsed().as_micros() as u64,
            decorations = self.decorations.len(),
            "recomputed decorations"
        );
        &self.decorations
    }
}
