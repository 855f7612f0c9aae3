//! Inline image scanner.
//!
//! Recognizes `![alt](url)` and `![alt](url "title")` on a single line.
//! The title falls back to the alt text so the widget always has a tooltip
//! to show.

use smol_str::SmolStr;

use super::{Token, TokenKind};

/// Scan for inline images. Anything malformed is left as plain text.
pub fn find_image_tokens(text: &str) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < n {
        match chars[i] {
            '\\' => i += 2,
            '!' if i + 1 < n && chars[i + 1] == '[' => match parse_image(&chars, i) {
                Some(token) => {
                    i = token.to;
                    tokens.push(token);
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }

    tokens
}

fn parse_image(chars: &[char], start: usize) -> Option<Token> {
    let n = chars.len();

    let alt_start = start + 2;
    let mut j = alt_start;
    while j < n && chars[j] != ']' && chars[j] != '\n' {
        j += 1;
    }
    if j >= n || chars[j] != ']' || j + 1 >= n || chars[j + 1] != '(' {
        return None;
    }
    let alt: SmolStr = chars[alt_start..j].iter().copied().collect();

    let url_start = j + 2;
    let mut k = url_start;
    while k < n && !chars[k].is_whitespace() && chars[k] != '"' && chars[k] != ')' {
        k += 1;
    }
    if k == url_start {
        return None;
    }
    let url: SmolStr = chars[url_start..k].iter().copied().collect();

    while k < n && (chars[k] == ' ' || chars[k] == '\t') {
        k += 1;
    }
    let title = if k < n && chars[k] == '"' {
        let title_start = k + 1;
        k = title_start;
        while k < n && chars[k] != '"' && chars[k] != '\n' {
            k += 1;
        }
        if k >= n || chars[k] != '"' {
            return None;
        }
        let title: SmolStr = chars[title_start..k].iter().copied().collect();
        k += 1;
        title
    } else {
        alt
    };

    if k < n && chars[k] == ')' {
        Some(Token {
            kind: TokenKind::Image { url, title },
            from: start,
            to: k + 1,
            content_from: start + 2,
            content_to: k,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_with_title() {
        let tokens = find_image_tokens("![cat](a.png \"Cat\")");
        assert_eq!(tokens.len(), 1);

        let token = &tokens[0];
        assert_eq!(token.from, 0);
        assert_eq!(token.to, 19);
        assert_eq!(token.content_from, 2);
        assert_eq!(token.content_to, 18);
        assert_eq!(
            token.kind,
            TokenKind::Image {
                url: "a.png".into(),
                title: "Cat".into(),
            }
        );
    }

    #[test]
    fn test_title_falls_back_to_alt() {
        let tokens = find_image_tokens("![cat](a.png)");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].to, 13);
        assert_eq!(
            tokens[0].kind,
            TokenKind::Image {
                url: "a.png".into(),
                title: "cat".into(),
            }
        );
    }

    #[test]
    fn test_two_images_in_one_line() {
        let tokens = find_image_tokens("![a](1.png) and ![b](2.png)");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].from, 0);
        assert_eq!(tokens[1].from, 16);
    }

    #[test]
    fn test_link_is_not_an_image() {
        assert!(find_image_tokens("[cat](a.png)").is_empty());
    }

    #[test]
    fn test_malformed_images() {
        assert!(find_image_tokens("![x](a b)").is_empty());
        assert!(find_image_tokens("![x](u").is_empty());
        assert!(find_image_tokens("![x]u)").is_empty());
        assert!(find_image_tokens("![x]()").is_empty());
        assert!(find_image_tokens("![x](u 'single')").is_empty());
        assert!(find_image_tokens("![x\ny](u)").is_empty());
    }

    #[test]
    fn test_escaped_bang_is_literal() {
        assert!(find_image_tokens("\\![x](u)").is_empty());
    }
}
