//! Document frontmatter scanner.
//!
//! A frontmatter block is a `---` line at offset zero, a run of plausibly
//! YAML-shaped lines, and a closing `---` line. One malformed interior line
//! invalidates the whole block so that a stray horizontal rule deeper in the
//! document never swallows prose.

use super::{Token, TokenKind};

/// Scan for a frontmatter block at the very start of the document.
///
/// The token covers both delimiter lines; the content range covers the lines
/// between them, trailing newline included.
pub fn find_frontmatter(text: &str) -> Option<Token> {
    let mut lines = text.split('\n');
    let first = lines.next()?;
    if first.trim_end_matches('\r') != "---" {
        return None;
    }

    let content_from = first.chars().count() + 1;
    let mut pos = content_from;
    for raw in lines {
        let line = raw.trim_end_matches('\r');
        let raw_len = raw.chars().count();
        if line == "---" {
            return Some(Token {
                kind: TokenKind::Frontmatter,
                from: 0,
                to: pos + raw_len,
                content_from,
                content_to: pos,
            });
        }
        if !is_plausible_yaml_line(line.trim()) {
            return None;
        }
        pos += raw_len + 1;
    }

    None
}

/// YAML shape check, deliberately loose: blank lines, comments, list items,
/// and anything with a colon pass.
fn is_plausible_yaml_line(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with("- ") || line.contains(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_frontmatter() {
        let token = find_frontmatter("---\ntitle: X\n---\nbody").unwrap();
        assert_eq!(token.kind, TokenKind::Frontmatter);
        assert_eq!(token.from, 0);
        assert_eq!(token.to, 16);
        assert_eq!(token.content_from, 4);
        assert_eq!(token.content_to, 13);
    }

    #[test]
    fn test_mixed_yaml_shapes() {
        let text = "---\n# comment\ntags:\n  - one\n- two\n\nnested: x\n---\n";
        let token = find_frontmatter(text).unwrap();
        assert_eq!(token.from, 0);
        assert_eq!(token.content_from, 4);
    }

    #[test]
    fn test_malformed_line_rejects_block() {
        assert!(find_frontmatter("---\nplain text\n---\n").is_none());
    }

    #[test]
    fn test_unclosed_rejected() {
        assert!(find_frontmatter("---\ntitle: X\nbody").is_none());
        assert!(find_frontmatter("---\n").is_none());
        assert!(find_frontmatter("---").is_none());
    }

    #[test]
    fn test_must_start_at_offset_zero() {
        assert!(find_frontmatter("\n---\ntitle: X\n---\n").is_none());
        assert!(find_frontmatter("x\n---\ntitle: X\n---\n").is_none());
    }

    #[test]
    fn test_crlf_lines() {
        let token = find_frontmatter("---\r\ntitle: X\r\n---\r\n").unwrap();
        assert_eq!(token.from, 0);
        assert_eq!(token.to, 19);
        assert_eq!(token.content_from, 5);
        assert_eq!(token.content_to, 15);
    }

    #[test]
    fn test_empty_content() {
        let token = find_frontmatter("---\n---").unwrap();
        assert_eq!(token.to, 7);
        assert_eq!(token.content_from, 4);
        assert_eq!(token.content_to, 4);
    }
}
