//! `$` and `$$` math span scanner.
//!
//! Inline math opens at a `$` whose next char is non-whitespace and closes
//! at a `$` whose previous char is non-whitespace; a blank line aborts the
//! span. Block math opens at `$$` and closes at the next `$$`, lines
//! notwithstanding. Backslash escapes both delimiters, and anything inside
//! inline code or a fenced region is skipped.

use super::fence::FencedRegion;
use super::{Token, TokenKind};

/// Scan for math spans, skipping fenced regions and inline code.
///
/// Unmatched delimiters degrade to literal text; a candidate that never
/// closes produces no token and scanning resumes just past it.
pub fn find_math_tokens(text: &str, fences: &[FencedRegion]) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();
    let mut tokens = Vec::new();
    let mut fence_idx = 0;
    let mut i = 0;

    while i < n {
        while fence_idx < fences.len() && fences[fence_idx].to <= i {
            fence_idx += 1;
        }
        if fence_idx < fences.len() && fences[fence_idx].from <= i {
            i = fences[fence_idx].to;
            continue;
        }

        match chars[i] {
            '\\' => i += 2,
            '`' => {
                let run = run_len(&chars, i);
                i = match find_code_close(&chars, i + run, run) {
                    Some(end) => end,
                    None => i + run,
                };
            }
            '$' => {
                let run = dollar_run(&chars, i);
                if run >= 2 {
                    match find_block_close(&chars, i + 2) {
                        Some(close) => {
                            tokens.push(Token {
                                kind: TokenKind::MathBlock,
                                from: i,
                                to: close + 2,
                                content_from: i + 2,
                                content_to: close,
                            });
                            i = close + 2;
                        }
                        None => i += run,
                    }
                } else if i + 1 < n && !chars[i + 1].is_whitespace() {
                    match find_inline_close(&chars, i + 2) {
                        Some(close) => {
                            tokens.push(Token {
                                kind: TokenKind::MathInline,
                                from: i,
                                to: close + 1,
                                content_from: i + 1,
                                content_to: close,
                            });
                            i = close + 1;
                        }
                        None => i += 1,
                    }
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    tokens
}

/// End of an inline-code span opened by a backtick run of `open` at the
/// current position: the close must be a run of exactly the same length.
fn find_code_close(chars: &[char], mut k: usize, open: usize) -> Option<usize> {
    while k < chars.len() {
        match chars[k] {
            '\\' => k += 2,
            '`' => {
                let run = run_len(chars, k);
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

/// Closing `$` for an inline span: previous char non-whitespace, no blank
/// line in between.
fn find_inline_close(chars: &[char], mut k: usize) -> Option<usize> {
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

/// Closing `$$` for a block span. A lone `$` inside the block is literal.
fn find_block_close(chars: &[char], mut k: usize) -> Option<usize> {
    while k < chars.len() {
        match chars[k] {
            '\\' => k += 2,
            '$' => {
                let run = dollar_run(chars, k);
                if run >= 2 {
                    return Some(k);
                }
                k += 1;
            }
            _ => k += 1,
        }
    }
    None
}

fn run_len(chars: &[char], start: usize) -> usize {
    chars[start..].iter().take_while(|&&c| c == '`').count()
}

fn dollar_run(chars: &[char], start: usize) -> usize {
    chars[start..].iter().take_while(|&&c| c == '$').count()
}

#[cfg(test)]
mod tests {
    use super::super::fence::find_fenced_regions;
    use super::*;

    fn scan(text: &str) -> Vec<Token> {
        find_math_tokens(text, &find_fenced_regions(text))
    }

    fn offsets(token: &Token) -> (usize, usize, usize, usize) {
        (token.from, token.to, token.content_from, token.content_to)
    }

    #[test]
    fn test_inline_math() {
        let tokens = scan("a $x+1$ b");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::MathInline);
        assert_eq!(offsets(&tokens[0]), (2, 7, 3, 6));

        let tokens = scan("a $x+12$ b");
        assert_eq!(offsets(&tokens[0]), (2, 8, 3, 7));
    }

    #[test]
    fn test_block_math() {
        let tokens = scan("$$x$$");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::MathBlock);
        assert_eq!(offsets(&tokens[0]), (0, 5, 2, 3));

        // Spans lines, single dollars inside are literal.
        let tokens = scan("$$\na = $1\n$$");
        assert_eq!(tokens.len(), 1);
        assert_eq!(offsets(&tokens[0]), (0, 12, 2, 10));
    }

    #[test]
    fn test_whitespace_adjacency() {
        assert!(scan("$ 5 $").is_empty());
        assert!(scan("a $x $ b").is_empty());
        assert!(scan("price: $5 and $6").is_empty());
    }

    #[test]
    fn test_escaped_dollar() {
        assert!(scan("a \\$x$ b").is_empty());

        // Escape inside the span keeps the scan going past the dollar.
        let tokens = scan("$a\\$b$");
        assert_eq!(tokens.len(), 1);
        assert_eq!(offsets(&tokens[0]), (0, 6, 1, 5));
    }

    #[test]
    fn test_unclosed_inline() {
        assert!(scan("$x").is_empty());
        assert!(scan("only $one delimiter").is_empty());
    }

    #[test]
    fn test_blank_line_aborts_inline() {
        assert!(scan("$a\n\nb$").is_empty());

        // A single newline does not.
        let tokens = scan("$a\nb$");
        assert_eq!(tokens.len(), 1);
        assert_eq!(offsets(&tokens[0]), (0, 5, 1, 4));
    }

    #[test]
    fn test_unclosed_block_degrades() {
        // The `$$` never closes; the later inline span is still found.
        let tokens = scan("$$ a $b$");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::MathInline);
        assert_eq!(offsets(&tokens[0]), (5, 8, 6, 7));
    }

    #[test]
    fn test_inline_code_hides_dollars() {
        // Unclosed backtick: literal, the math after it is found.
        let tokens = scan("`$a\n\n $b$");
        assert_eq!(tokens.len(), 1);
        assert_eq!(offsets(&tokens[0]), (6, 9, 7, 8));

        // Double-backtick span containing a single backtick.
        let tokens = scan("``x` y`` $z$");
        assert_eq!(tokens.len(), 1);
        assert_eq!(offsets(&tokens[0]), (9, 12, 10, 11));

        // Unclosed double backtick is literal.
        let tokens = scan("`` $x$");
        assert_eq!(tokens.len(), 1);
        assert_eq!(offsets(&tokens[0]), (3, 6, 4, 5));

        assert!(scan("`$x$`").is_empty());
    }

    #[test]
    fn test_fenced_region_skipped() {
        let tokens = scan("```\n$x$\n```\n$y$");
        assert_eq!(tokens.len(), 1);
        assert_eq!(offsets(&tokens[0]), (12, 15, 13, 14));
    }
}
