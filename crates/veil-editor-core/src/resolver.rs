//! Decoration resolver.
//!
//! Combines tokenizer output, syntax tree nodes, and per-line analysis
//! into one [`DecorationSet`] for the current frame. Cursor proximity is
//! decided here and nowhere else:
//!
//! - token widgets (math, tables, diagrams, frontmatter, images) reveal
//!   their source while the cursor is inside the token range, ends
//!   inclusive
//! - marker nodes (header, emphasis, code, link) reveal while the cursor
//!   is anywhere inside the parent construct
//! - task checkboxes reveal only while the cursor is inside the marker
//!   itself; list bullets follow the whole list item
//! - quote `>` markers reveal while the cursor is on their line
//! - code block styling and toolbars ignore the cursor entirely

use smol_str::SmolStr;

use crate::decoration::{
    Decoration, DecorationSet, PRIORITY_LINE, PRIORITY_TOKEN, PRIORITY_TREE,
};
use crate::scan::{self, TokenKind, char_slice, line_spans};
use crate::syntax::{SyntaxProvider, node};
use crate::types::{CursorState, Viewport};
use crate::widget::WidgetPayload;

/// Resolver knobs, host-configurable.
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// Fence info strings treated as diagram sources.
    pub diagram_keywords: Vec<SmolStr>,
    /// Blockquote depth classes saturate here.
    pub quote_depth_cap: usize,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            diagram_keywords: vec![SmolStr::new_static("mermaid")],
            quote_depth_cap: 5,
        }
    }
}

impl ResolveConfig {
    pub fn with_diagram_keywords(mut self, keywords: Vec<SmolStr>) -> Self {
        self.diagram_keywords = keywords;
        self
    }

    pub fn with_quote_depth_cap(mut self, cap: usize) -> Self {
        self.quote_depth_cap = cap;
        self
    }
}

/// Resolve the decoration set for one frame.
///
/// Token widgets are resolved for the whole document so scrolling never
/// pops them in; tree and line work is restricted to the viewport. A
/// failing provider downgrades the frame to token and line decorations
/// only.
pub fn resolve<P: SyntaxProvider>(
    text: &str,
    cursor: &CursorState,
    viewport: &Viewport,
    provider: P,
    config: &ResolveConfig,
) -> DecorationSet {
    let scan = scan::scan_document(text, &config.diagram_keywords);
    let lines = line_spans(text);
    let mut decorations = Vec::new();

    // Token widgets, cursor-gated.
    let mut replaced = Vec::new();
    for token in &scan.tokens {
        if cursor.in_range(&token.range()) {
            continue;
        }
        let payload = match &token.kind {
            TokenKind::MathInline => WidgetPayload::Math {
                source: char_slice(text, token.content_range()),
                display: false,
            },
            TokenKind::MathBlock => WidgetPayload::Math {
                source: char_slice(text, token.content_range()),
                display: true,
            },
            TokenKind::Frontmatter => WidgetPayload::FrontmatterBlock {
                source: char_slice(text, token.content_range()),
            },
            TokenKind::Table(data) => WidgetPayload::Table(data.clone()),
            TokenKind::DiagramFence => WidgetPayload::Diagram {
                source: char_slice(text, token.content_range()),
            },
            TokenKind::Image { url, title } => WidgetPayload::Image {
                url: url.clone(),
                title: title.clone(),
            },
        };
        decorations.push(Decoration::replace(token.range(), payload, PRIORITY_TOKEN));
        replaced.push(token.range());
    }

    // Structure nodes from the host tree, viewport only.
    let nodes = match provider.nodes_in(text, viewport.from..viewport.to) {
        Ok(nodes) => nodes,
        Err(error) => {
            tracing::warn!(
                target: "veil::resolve",
                %error,
                "syntax provider failed, dropping structure decorations for this frame"
            );
            Vec::new()
        }
    };
    for syntax_node in &nodes {
        let contained = replaced
            .iter()
            .any(|r| r.start <= syntax_node.range.start && syntax_node.range.end <= r.end);
        if contained {
            continue;
        }

        match syntax_node.name.as_str() {
            node::HEADER_MARK | node::EMPHASIS_MARK | node::CODE_MARK | node::LINK_MARK => {
                if syntax_node.parent_range.is_some()
                    && !syntax_node.cursor_in_range(cursor.head)
                {
                    decorations.push(Decoration::hide(syntax_node.range.clone(), PRIORITY_TREE));
                }
            }
            node::TASK_MARKER => {
                // The marker's own range gates the checkbox, not the item.
                if !cursor.in_range(&syntax_node.range) {
                    let marker = char_slice(text, syntax_node.range.clone());
                    let checked = marker.contains(['x', 'X']);
                    decorations.push(Decoration::replace(
                        syntax_node.range.clone(),
                        WidgetPayload::Checkbox {
                            checked,
                            pos: syntax_node.range.start,
                        },
                        PRIORITY_TREE,
                    ));
                }
            }
            node::LIST_MARK => {
                if !syntax_node.cursor_in_range(cursor.head) {
                    let marker = char_slice(text, syntax_node.range.clone());
                    let ordered = marker
                        .chars()
                        .next()
                        .is_some_and(|c| c.is_ascii_digit());
                    let number = marker.trim_end_matches(['.', ')']).parse().ok();
                    decorations.push(Decoration::replace(
                        syntax_node.range.clone(),
                        WidgetPayload::ListBullet { ordered, number },
                        PRIORITY_TREE,
                    ));
                }
            }
            node::INLINE_CODE => {
                decorations.push(Decoration::mark(
                    syntax_node.range.clone(),
                    "inline-code",
                    PRIORITY_TREE,
                ));
            }
            node::FRONTMATTER => {
                decorations.push(Decoration::mark(
                    syntax_node.range.clone(),
                    "frontmatter",
                    PRIORITY_TREE,
                ));
            }
            // Quote markers belong to the line pass below.
            node::QUOTE_MARK => {}
            _ => {}
        }
    }

    // Blockquote lines, viewport only.
    for (range, line) in &lines {
        if !viewport.intersects(range) {
            continue;
        }
        let mut depth = 0usize;
        let mut marks = Vec::new();
        for (offset, c) in line.chars().enumerate() {
            match c {
                ' ' | '\t' => {}
                '>' => {
                    depth += 1;
                    marks.push(range.start + offset);
                }
                _ => break,
            }
        }
        if depth == 0 {
            continue;
        }

        let class = format!("blockquote-depth-{}", depth.min(config.quote_depth_cap));
        decorations.push(Decoration::line(range.start, class, PRIORITY_LINE));

        let cursor_on_line = cursor.head >= range.start && cursor.head <= range.end;
        if !cursor_on_line {
            for mark in marks {
                decorations.push(Decoration::hide(mark..mark + 1, PRIORITY_LINE));
            }
        }
    }

    // Code block styling and toolbars, viewport only. Diagram fences are
    // already widgets; unclosed fences stay unstyled while being typed.
    for fence in &scan.fences {
        if !fence.closed {
            continue;
        }
        if config.diagram_keywords.iter().any(|kw| *kw == fence.info) {
            continue;
        }
        if !viewport.intersects(&(fence.from..fence.to)) {
            continue;
        }

        let first = line_index(&lines, fence.from);
        let last = line_index(&lines, fence.to.saturating_sub(1));
        for (idx, (range, _)) in lines.iter().enumerate().take(last + 1).skip(first) {
            decorations.push(Decoration::line(
                range.start,
                "code-block-line",
                PRIORITY_LINE,
            ));
            if idx == first {
                decorations.push(Decoration::line(
                    range.start,
                    "code-block-start",
                    PRIORITY_LINE,
                ));
            }
            if idx == last {
                decorations.push(Decoration::line(
                    range.start,
                    "code-block-end",
                    PRIORITY_LINE,
                ));
            }
        }

        if first < last {
            let anchor = lines[first].0.start;
            let content_to = fence.content_from.max(lines[last].0.start.saturating_sub(1));
            decorations.push(Decoration::replace(
                anchor..anchor,
                WidgetPayload::CodeToolbar {
                    language: fence.info.clone(),
                    content_from: fence.content_from,
                    content_to,
                },
                PRIORITY_TREE,
            ));
        }
    }

    let set = DecorationSet::build(decorations);
    tracing::trace!(
        target: "veil::resolve",
        tokens = scan.tokens.len(),
        nodes = nodes.len(),
        decorations = set.len(),
        "resolved frame decorations"
    );
    set
}

/// Index of the line containing `pos`. Position at a newline belongs to
/// the line the newline terminates.
fn line_index(lines: &[(std::ops::Range<usize>, &str)], pos: usize) -> usize {
    lines
        .partition_point(|(range, _)| range.end < pos)
        .min(lines.len().saturating_sub(1))
}
