//! Span tokenizers for structured markdown constructs.
//!
//! Each tokenizer is a pure function over the raw document text, returning
//! ranges for one construct: math (`math`), frontmatter (`frontmatter`),
//! tables (`table`), fenced diagrams (`fence`), and inline images (`image`).
//! `scan_document` runs all of them and merges their output into a single
//! ordered, non-overlapping token stream. The `inline` module holds the
//! recursive-descent micro-parser used to decompose isolated fragments such
//! as table cells.
//!
//! All offsets are char offsets into the scanned text.

use std::ops::Range;

use smol_str::SmolStr;

pub mod fence;
pub mod frontmatter;
pub mod image;
pub mod inline;
pub mod math;
pub mod table;

pub use fence::FencedRegion;
pub use inline::{InlineNode, parse_inline};
pub use table::{Alignment, TableData};

/// A recognized structured-construct range, prior to any rendering decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Start of the whole construct, delimiters included.
    pub from: usize,
    /// End of the whole construct (exclusive), delimiters included.
    pub to: usize,
    /// Start of the content between the delimiters.
    pub content_from: usize,
    /// End of the content between the delimiters (exclusive).
    pub content_to: usize,
}

/// Construct classification, carrying payloads that are parsed at
/// recognition time. Payloads that are plain slices of the document (math
/// source, diagram source) are materialized later from the content range.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `$...$`
    MathInline,
    /// `$$...$$`
    MathBlock,
    /// `---` document header block.
    Frontmatter,
    /// Pipe table with parsed rows.
    Table(TableData),
    /// Fenced code block whose info string names a diagram grammar.
    DiagramFence,
    /// `![alt](url "title")`
    Image { url: SmolStr, title: SmolStr },
}

impl Token {
    /// Range of the whole construct.
    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }

    /// Range of the content between the delimiters.
    pub fn content_range(&self) -> Range<usize> {
        self.content_from..self.content_to
    }
}

/// Output of a full-document scan: the merged token stream plus the raw
/// fenced regions (the resolver styles non-diagram code blocks from them).
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub tokens: Vec<Token>,
    pub fences: Vec<FencedRegion>,
}

/// Run every tokenizer and merge the results into one stream ordered by
/// `from` with no overlaps.
///
/// Overlaps between constructs are resolved first-start-wins, longer-wins on
/// an equal start. A `$...$` inside a table row is therefore dropped here and
/// re-derived by the table widget through [`parse_inline`]; a `|` line inside
/// frontmatter never becomes a table.
pub fn scan_document(text: &str, diagram_keywords: &[SmolStr]) -> ScanResult {
    let fences = fence::find_fenced_regions(text);

    let mut tokens = math::find_math_tokens(text, &fences);
    tokens.extend(fence::find_diagram_tokens(&fences, diagram_keywords));
    if let Some(matter) = frontmatter::find_frontmatter(text) {
        tokens.push(matter);
    }
    tokens.extend(table::find_table_tokens(text));
    tokens.extend(image::find_image_tokens(text));

    let total = tokens.len();
    tokens.sort_by(|a, b| a.from.cmp(&b.from).then(b.to.cmp(&a.to)));

    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match merged.last() {
            Some(prev) if token.from < prev.to => {
                tracing::trace!(
                    target: "veil::scan",
                    from = token.from,
                    to = token.to,
                    "dropping token shadowed by an earlier construct"
                );
            }
            _ => merged.push(token),
        }
    }

    if total != merged.len() {
        tracing::trace!(
            target: "veil::scan",
            total,
            merged = merged.len(),
            "merged structured tokens"
        );
    }

    ScanResult {
        tokens: merged,
        fences,
    }
}

/// Slice a char range out of a `&str`.
///
/// Tokenizer offsets are char offsets, so this walks rather than indexing;
/// use it to materialize token content (math source, diagram source).
pub fn char_slice(text: &str, range: Range<usize>) -> SmolStr {
    text.chars()
        .skip(range.start)
        .take(range.end.saturating_sub(range.start))
        .collect()
}

/// Char-offset span and text of every physical line, newline excluded.
///
/// The empty document yields a single empty line, matching the buffer's
/// line conventions.
pub fn line_spans(text: &str) -> Vec<(Range<usize>, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    for line in text.split('\n') {
        let len = line.chars().count();
        out.push((start..start + len, line));
        start += len + 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_slice_multibyte() {
        let text = "a🌍b🌍c";
        assert_eq!(char_slice(text, 0..1).as_str(), "a");
        assert_eq!(char_slice(text, 1..2).as_str(), "🌍");
        assert_eq!(char_slice(text, 2..5).as_str(), "b🌍c");
        assert_eq!(char_slice(text, 4..4).as_str(), "");
    }

    #[test]
    fn test_line_spans() {
        let spans = line_spans("ab\nc\n\nd");
        assert_eq!(
            spans,
            vec![(0..2, "ab"), (3..4, "c"), (5..5, ""), (6..7, "d")]
        );

        assert_eq!(line_spans(""), vec![(0..0, "")]);
        assert_eq!(line_spans("a\n"), vec![(0..1, "a"), (2..2, "")]);
    }

    #[test]
    fn test_scan_document_orders_and_deduplicates() {
        // Inline math ahead of a table; the math inside a cell is shadowed.
        let text = "$x$ intro\n\na|b\n-|-\n$y$|2\ntail";
        let result = scan_document(text, &[]);

        assert_eq!(result.tokens.len(), 2);
        assert_eq!(result.tokens[0].kind, TokenKind::MathInline);
        assert!(matches!(result.tokens[1].kind, TokenKind::Table(_)));

        // Ordered by `from`, pairwise non-overlapping.
        for pair in result.tokens.windows(2) {
            assert!(pair[0].to <= pair[1].from);
        }
    }

    #[test]
    fn test_scan_document_frontmatter_shadows_table() {
        // Every line is valid frontmatter, but the middle two also parse as
        // a pipe table. First start wins.
        let text = "---\na|b: x\n:-|-:\n---\nafter";
        let result = scan_document(text, &[]);

        assert_eq!(result.tokens.len(), 1);
        assert_eq!(result.tokens[0].kind, TokenKind::Frontmatter);
        assert_eq!(result.tokens[0].from, 0);
        assert_eq!(result.tokens[0].to, 20);
    }
}
