//! Pipe table scanner.
//!
//! A table is a header line containing `|`, a separator line of dashes and
//! optional alignment colons, and zero or more body lines containing `|`.
//! Rows are parsed into trimmed cells here so the widget payload carries
//! ready-to-render data.

use smol_str::SmolStr;

use super::{Token, TokenKind, line_spans};

/// Column alignment taken from the separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Parsed table rows, cell text trimmed and pipe-unescaped.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub header: Vec<SmolStr>,
    pub alignments: Vec<Alignment>,
    pub body: Vec<Vec<SmolStr>>,
}

/// Scan for pipe tables, one token per table.
///
/// The token covers the header line through the last body line; the content
/// range equals the full range, since the delimiters are woven through the
/// construct rather than bracketing it.
pub fn find_table_tokens(text: &str) -> Vec<Token> {
    let lines = line_spans(text);
    let mut tokens = Vec::new();
    let mut i = 0;

    while i + 1 < lines.len() {
        let (header_range, header_text) = &lines[i];
        if !header_text.contains('|') {
            i += 1;
            continue;
        }
        let Some(alignments) = parse_separator_row(lines[i + 1].1) else {
            i += 1;
            continue;
        };

        let mut j = i + 2;
        while j < lines.len() && lines[j].1.contains('|') {
            j += 1;
        }

        let body = lines[i + 2..j]
            .iter()
            .map(|(_, line)| split_row(line))
            .collect();
        let from = header_range.start;
        let to = lines[j - 1].0.end;
        tokens.push(Token {
            kind: TokenKind::Table(TableData {
                header: split_row(header_text),
                alignments,
                body,
            }),
            from,
            to,
            content_from: from,
            content_to: to,
        });
        i = j;
    }

    tokens
}

/// Split one row into trimmed cells. Boundary pipes are decorative and
/// dropped; `\|` is a literal pipe inside a cell.
pub fn split_row(line: &str) -> Vec<SmolStr> {
    let mut row = line.trim();
    if let Some(stripped) = row.strip_prefix('|') {
        row = stripped;
    }
    if row.ends_with('|') && !row.ends_with("\\|") {
        row = &row[..row.len() - 1];
    }

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = row.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => {
                cells.push(SmolStr::from(cell.trim()));
                cell.clear();
            }
            _ => cell.push(c),
        }
    }
    cells.push(SmolStr::from(cell.trim()));
    cells
}

/// Parse a separator row into per-column alignments, or `None` when the
/// line is not a separator at all.
fn parse_separator_row(line: &str) -> Option<Vec<Alignment>> {
    if !line.contains('|') || !line.contains('-') {
        return None;
    }
    split_row(line)
        .iter()
        .map(|cell| parse_alignment(cell))
        .collect()
}

fn parse_alignment(cell: &str) -> Option<Alignment> {
    if cell.is_empty() {
        return Some(Alignment::Left);
    }
    let (leading, rest) = match cell.strip_prefix(':') {
        Some(rest) => (true, rest),
        None => (false, cell),
    };
    let (trailing, dashes) = match rest.strip_suffix(':') {
        Some(dashes) => (true, dashes),
        None => (false, rest),
    };
    if dashes.is_empty() || !dashes.chars().all(|c| c == '-') {
        return None;
    }
    Some(match (leading, trailing) {
        (true, true) => Alignment::Center,
        (false, true) => Alignment::Right,
        _ => Alignment::Left,
    })
}
