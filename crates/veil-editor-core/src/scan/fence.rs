//! Backtick fence scanner.
//!
//! Finds ``` fenced regions in a single pass and classifies the ones whose
//! info string names a diagram grammar. The raw regions are also consumed by
//! the resolver to style ordinary code blocks and by the math scanner to
//! skip `$` characters inside code.

use smol_str::SmolStr;

use super::{Token, TokenKind};

/// One ``` fenced region, closed or running to end of document.
#[derive(Debug, Clone, PartialEq)]
pub struct FencedRegion {
    /// Start of the opening fence.
    pub from: usize,
    /// End of the region (exclusive): past the closing fence, or end of
    /// document when unclosed.
    pub to: usize,
    /// First char after the opening fence line's newline.
    pub content_from: usize,
    /// Start of the closing fence line, or end of document when unclosed.
    pub content_to: usize,
    /// Info string after the opening backticks, trimmed.
    pub info: SmolStr,
    pub closed: bool,
}

/// Scan the document for ``` fenced regions, in order.
///
/// A fence opens at a run of three or more backticks and closes at the next
/// run of three or more; backticks inside the region are taken literally
/// otherwise. An unclosed fence swallows the rest of the document.
pub fn find_fenced_regions(text: &str) -> Vec<FencedRegion> {
    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();
    let mut regions = Vec::new();
    let mut i = 0;

    while i < n {
        if chars[i] != '`' {
            i += 1;
            continue;
        }
        let run = run_len(&chars, i, '`');
        if run < 3 {
            i += run;
            continue;
        }

        let open_end = i + run;
        let newline = (open_end..n).find(|&k| chars[k] == '\n');
        let info: SmolStr = chars[open_end..newline.unwrap_or(n)]
            .iter()
            .collect::<String>()
            .trim()
            .into();

        let Some(newline) = newline else {
            // Opening fence with no body; runs to end of document.
            regions.push(FencedRegion {
                from: i,
                to: n,
                content_from: n,
                content_to: n,
                info,
                closed: false,
            });
            break;
        };

        let content_from = newline + 1;
        let mut close = None;
        let mut k = content_from;
        while k < n {
            if chars[k] == '`' {
                let r = run_len(&chars, k, '`');
                if r >= 3 {
                    close = Some((k, r));
                    break;
                }
                k += r;
            } else {
                k += 1;
            }
        }

        match close {
            Some((start, r)) => {
                regions.push(FencedRegion {
                    from: i,
                    to: start + r,
                    content_from,
                    content_to: start,
                    info,
                    closed: true,
                });
                i = start + r;
            }
            None => {
                regions.push(FencedRegion {
                    from: i,
                    to: n,
                    content_from,
                    content_to: n,
                    info,
                    closed: false,
                });
                break;
            }
        }
    }

    regions
}

/// Diagram tokens for every closed fence whose info string is one of the
/// configured grammar keywords. Unclosed fences stay plain code while the
/// author is still typing the block.
pub fn find_diagram_tokens(regions: &[FencedRegion], keywords: &[SmolStr]) -> Vec<Token> {
    regions
        .iter()
        .filter(|region| region.closed && keywords.iter().any(|kw| *kw == region.info))
        .map(|region| Token {
            kind: TokenKind::DiagramFence,
            from: region.from,
            to: region.to,
            content_from: region.content_from,
            content_to: region.content_to,
        })
        .collect()
}

fn run_len(chars: &[char], start: usize, ch: char) -> usize {
    chars[start..].iter().take_while(|&&c| c == ch).count()
}
