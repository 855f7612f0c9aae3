//! Recursive-descent micro-parser for inline markdown fragments.
//!
//! Widgets that re-render isolated text out of context (table cells, image
//! titles) decompose it here instead of pattern-matching on raw strings.
//! The grammar covers code spans, math, strong, emphasis, and
//! strikethrough; anything unmatched degrades to literal text.

use smol_str::SmolStr;

/// One node of a parsed inline fragment. Container variants hold their
/// parsed children; `Code` and `Math` hold verbatim source.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineNode {
    Text(SmolStr),
    Code(SmolStr),
    Math { source: SmolStr, display: bool },
    Strong(Vec<InlineNode>),
    Emphasis(Vec<InlineNode>),
    Strike(Vec<InlineNode>),
}

/// Parse a fragment into a node tree. Never fails; unmatched delimiters
/// come back as text.
pub fn parse_inline(text: &str) -> Vec<InlineNode> {
    let chars: Vec<char> = text.chars().collect();
    parse_nodes(&chars)
}

fn parse_nodes(chars: &[char]) -> Vec<InlineNode> {
    let n = chars.len();
    let mut nodes = Vec::new();
    let mut buf = String::new();
    let mut i = 0;

    while i < n {
        match chars[i] {
            '\\' if i + 1 < n && is_escapable(chars[i + 1]) => {
                buf.push(chars[i + 1]);
                i += 2;
            }
            '`' => {
                let run = backtick_run(chars, i);
                match find_code_close(chars, i + run, run) {
                    Some(end) => {
                        flush(&mut nodes, &mut buf);
                        nodes.push(InlineNode::Code(collect(chars, i + run, end - run)));
                        i = end;
                    }
                    None => {
                        for _ in 0..run {
                            buf.push('`');
                        }
                        i += run;
                    }
                }
            }
            '$' if i + 1 < n && chars[i + 1] == '$' => match find_block_math_close(chars, i + 2) {
                Some(close) => {
                    flush(&mut nodes, &mut buf);
                    nodes.push(InlineNode::Math {
                        source: collect(chars, i + 2, close),
                        display: true,
                    });
                    i = close + 2;
                }
                None => {
                    buf.push('$');
                    i += 1;
                }
            },
            '$' if i + 1 < n && !chars[i + 1].is_whitespace() => {
                match find_inline_math_close(chars, i + 2) {
                    Some(close) => {
                        flush(&mut nodes, &mut buf);
                        nodes.push(InlineNode::Math {
                            source: collect(chars, i + 1, close),
                            display: false,
                        });
                        i = close + 1;
                    }
                    None => {
                        buf.push('$');
                        i += 1;
                    }
                }
            }
            '*' if i + 1 < n && chars[i + 1] == '*' => {
                match find_double_close(chars, i + 2, '*') {
                    Some(close) if close > i + 2 => {
                        flush(&mut nodes, &mut buf);
                        nodes.push(InlineNode::Strong(parse_nodes(&chars[i + 2..close])));
                        i = close + 2;
                    }
                    _ => {
                        buf.push('*');
                        i += 1;
                    }
                }
            }
            '~' if i + 1 < n && chars[i + 1] == '~' => {
                match find_double_close(chars, i + 2, '~') {
                    Some(close) if close > i + 2 => {
                        flush(&mut nodes, &mut buf);
                        nodes.push(InlineNode::Strike(parse_nodes(&chars[i + 2..close])));
                        i = close + 2;
                    }
                    _ => {
                        buf.push('~');
                        i += 1;
                    }
                }
            }
            '*' if i + 1 < n && !chars[i + 1].is_whitespace() => {
                match find_emphasis_close(chars, i + 2) {
                    Some(close) => {
                        flush(&mut nodes, &mut buf);
                        nodes.push(InlineNode::Emphasis(parse_nodes(&chars[i + 1..close])));
                        i = close + 1;
                    }
                    None => {
                        buf.push('*');
                        i += 1;
                    }
                }
            }
            c => {
                buf.push(c);
                i += 1;
            }
        }
    }

    flush(&mut nodes, &mut buf);
    nodes
}

fn is_escapable(c: char) -> bool {
    matches!(c, '`' | '$' | '*' | '~' | '\\')
}

fn flush(nodes: &mut Vec<InlineNode>, buf: &mut String) {
    if !buf.is_empty() {
        nodes.push(InlineNode::Text(SmolStr::from(buf.as_str())));
        buf.clear();
    }
}

fn collect(chars: &[char], from: usize, to: usize) -> SmolStr {
    chars[from..to].iter().copied().collect()
}

fn backtick_run(chars: &[char], start: usize) -> usize {
    chars[start..].iter().take_while(|&&c| c == '`').count()
}

/// Position just past a closing backtick run of exactly `open` backticks.
fn find_code_close(chars: &[char], mut k: usize, open: usize) -> Option<usize> {
    while k < chars.len() {
        match chars[k] {
            '\\' => k += 2,
            '`' => {
                let run = backtick_run(chars, k);
                if run == open {
                    return Some(k + run);
                }
                k += run;
            }
            _ => k += 1,
        }
    }
    None
}

fn find_block_math_close(chars: &[char], mut k: usize) -> Option<usize> {
    while k + 1 < chars.len() {
        match chars[k] {
            '\\' => k += 2,
            '$' if chars[k + 1] == '$' => return Some(k),
            _ => k += 1,
        }
    }
    None
}

fn find_inline_math_close(chars: &[char], mut k: usize) -> Option<usize> {
    while k < chars.len() {
        match chars[k] {
            '\\' => k += 2,
            '\n' if k + 1 < chars.len() && chars[k + 1] == '\n' => return None,
            '$' if !chars[k - 1].is_whitespace() => return Some(k),
            _ => k += 1,
        }
    }
    None
}

fn find_emphasis_close(chars: &[char], mut k: usize) -> Option<usize> {
    while k < chars.len() {
        match chars[k] {
            '\\' => k += 2,
            '\n' if k + 1 < chars.len() && chars[k + 1] == '\n' => return None,
            '`' => {
                let run = backtick_run(chars, k);
                match find_code_close(chars, k + run, run) {
                    Some(end) => k = end,
                    None => k += run,
                }
            }
            '*' if !chars[k - 1].is_whitespace() => return Some(k),
            _ => k += 1,
        }
    }
    None
}

/// Double-char close (`**`, `~~`), skipping escapes and code spans.
fn find_double_close(chars: &[char], mut k: usize, ch: char) -> Option<usize> {
    while k + 1 < chars.len() {
        match chars[k] {
            '\\' => k += 2,
            '`' => {
                let run = backtick_run(chars, k);
                match find_code_close(chars, k + run, run) {
                    Some(end) => k = end,
                    None => k += run,
                }
            }
            c if c == ch && chars[k + 1] == ch => return Some(k),
            _ => k += 1,
        }
    }
    None
}
