//! Decorations and the set invariants the host relies on.
//!
//! A decoration is a range plus a rendering instruction. [`DecorationSet`]
//! normalizes a raw batch: position-sorted, and no two range-consuming
//! decorations overlap. Hosts can apply the set in one pass without their
//! own conflict handling.

use std::ops::Range;

use smol_str::SmolStr;

use crate::widget::WidgetPayload;

/// Whole-line paint and quote-mark hiding.
pub const PRIORITY_LINE: u8 = 0;
/// Syntax-tree driven marks and widgets.
pub const PRIORITY_TREE: u8 = 1;
/// Tokenizer-driven widgets; these win every conflict.
pub const PRIORITY_TOKEN: u8 = 2;

/// Rendering instruction for one range.
#[derive(Debug, Clone, PartialEq)]
pub enum DecorationKind {
    /// Remove the range from the rendered view.
    Hide,
    /// Replace the range with a widget.
    Replace(WidgetPayload),
    /// Style the range, text still visible.
    Mark(SmolStr),
    /// Style the whole line containing the (zero-width) anchor.
    Line(SmolStr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    pub range: Range<usize>,
    pub kind: DecorationKind,
    pub priority: u8,
}

impl Decoration {
    pub fn hide(range: Range<usize>, priority: u8) -> Self {
        Self {
            range,
            kind: DecorationKind::Hide,
            priority,
        }
    }

    pub fn replace(range: Range<usize>, payload: WidgetPayload, priority: u8) -> Self {
        Self {
            range,
            kind: DecorationKind::Replace(payload),
            priority,
        }
    }

    pub fn mark(range: Range<usize>, class: impl Into<SmolStr>, priority: u8) -> Self {
        Self {
            range,
            kind: DecorationKind::Mark(class.into()),
            priority,
        }
    }

    /// Line decorations anchor zero-width at the line start.
    pub fn line(at: usize, class: impl Into<SmolStr>, priority: u8) -> Self {
        Self {
            range: at..at,
            kind: DecorationKind::Line(class.into()),
            priority,
        }
    }

    /// Whether this decoration consumes text. Zero-width replacements
    /// (toolbar anchors) consume nothing and never conflict.
    pub fn is_solid(&self) -> bool {
        !self.range.is_empty()
            && matches!(
                self.kind,
                DecorationKind::Hide | DecorationKind::Replace(_)
            )
    }

    fn kind_rank(&self) -> u8 {
        match self.kind {
            DecorationKind::Line(_) => 0,
            DecorationKind::Mark(_) => 1,
            DecorationKind::Hide => 2,
            DecorationKind::Replace(_) => 3,
        }
    }
}

/// Normalized, host-ready batch of decorations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecorationSet {
    items: Vec<Decoration>,
}

impl DecorationSet {
    /// Normalize a raw batch.
    ///
    /// Overlapping solid decorations are resolved by priority, then by
    /// earlier start; losers are dropped, not clipped. Marks and line
    /// styles layer freely. The survivors come out sorted by start, end,
    /// and kind, which makes the set order deterministic for a given
    /// input.
    pub fn build(items: Vec<Decoration>) -> Self {
        let mut keep = vec![true; items.len()];

        let mut order: Vec<usize> = (0..items.len()).filter(|&i| items[i].is_solid()).collect();
        order.sort_by(|&a, &b| {
            items[b]
                .priority
                .cmp(&items[a].priority)
                .then(items[a].range.start.cmp(&items[b].range.start))
                .then(items[b].range.end.cmp(&items[a].range.end))
        });

        let mut taken: Vec<Range<usize>> = Vec::new();
        for idx in order {
            let range = items[idx].range.clone();
            if taken
                .iter()
                .any(|t| t.start < range.end && range.start < t.end)
            {
                tracing::debug!(
                    target: "veil::resolve",
                    from = range.start,
                    to = range.end,
                    priority = items[idx].priority,
                    "dropping solid decoration overlapped by a stronger one"
                );
                keep[idx] = false;
            } else {
                taken.push(range);
            }
        }

        let mut items: Vec<Decoration> = items
            .into_iter()
            .zip(keep)
            .filter_map(|(item, kept)| kept.then_some(item))
            .collect();
        items.sort_by(|a, b| {
            a.range
                .start
                .cmp(&b.range.start)
                .then(a.range.end.cmp(&b.range.end))
                .then(a.kind_rank().cmp(&b.kind_rank()))
        });

        Self { items }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Decoration] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn math(range: Range<usize>, priority: u8) -> Decoration {
        Decoration::replace(
            range,
            WidgetPayload::Math {
                source: "x".into(),
                display: false,
            },
            priority,
        )
    }

    #[test]
    fn test_build_sorts_by_position_then_kind() {
        let set = DecorationSet::build(vec![
            Decoration::hide(5..7, PRIORITY_TREE),
            Decoration::line(0, "blockquote-depth-1", PRIORITY_LINE),
            Decoration::mark(2..4, "inline-code", PRIORITY_TREE),
        ]);

        let starts: Vec<usize> = set.iter().map(|d| d.range.start).collect();
        assert_eq!(starts, [0, 2, 5]);
    }

    #[test]
    fn test_line_sorts_before_hide_at_same_start() {
        let set = DecorationSet::build(vec![
            Decoration::hide(0..1, PRIORITY_LINE),
            Decoration::line(0, "blockquote-depth-1", PRIORITY_LINE),
        ]);

        assert!(matches!(set.as_slice()[0].kind, DecorationKind::Line(_)));
        assert!(matches!(set.as_slice()[1].kind, DecorationKind::Hide));
    }

    #[test]
    fn test_higher_priority_solid_wins_overlap() {
        let set = DecorationSet::build(vec![
            Decoration::hide(3..6, PRIORITY_TREE),
            math(0..10, PRIORITY_TOKEN),
        ]);

        assert_eq!(set.len(), 1);
        assert!(matches!(set.as_slice()[0].kind, DecorationKind::Replace(_)));
    }

    #[test]
    fn test_equal_priority_earlier_start_wins() {
        let set = DecorationSet::build(vec![
            math(4..9, PRIORITY_TOKEN),
            math(0..6, PRIORITY_TOKEN),
        ]);

        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].range, 0..6);
    }

    #[test]
    fn test_marks_layer_over_solids() {
        let set = DecorationSet::build(vec![
            math(0..8, PRIORITY_TOKEN),
            Decoration::mark(2..5, "inline-code", PRIORITY_TREE),
        ]);

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_zero_width_replace_never_conflicts() {
        let toolbar = Decoration::replace(
            4..4,
            WidgetPayload::CodeToolbar {
                language: "rust".into(),
                content_from: 8,
                content_to: 20,
            },
            PRIORITY_TREE,
        );
        let set = DecorationSet::build(vec![math(0..10, PRIORITY_TOKEN), toolbar]);

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_adjacent_solids_both_survive() {
        let set = DecorationSet::build(vec![
            math(0..4, PRIORITY_TOKEN),
            math(4..8, PRIORITY_TOKEN),
        ]);

        assert_eq!(set.len(), 2);
    }
}
