//! Whitespace/quote-aware line tokenizer.
//!
//! Splits one line of a skin file into tokens. `#` outside quotes starts a
//! comment. Escapes: `\t`, `\"`, `\n`, `\\`, plus the two context escapes
//! `\@` and `\$` which keep the sigil but protect it from the resolver;
//! the protection marker is stripped again by the resolver's final
//! normalization pass (see [`unescape_markers`]).

/// One token of a line, with its quoting flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// True when the token came from a `"..."` group. Empty quoted tokens
    /// are preserved; empty unquoted tokens are dropped.
    pub quoted: bool,
}

impl Token {
    fn new(text: String, quoted: bool) -> Self {
        Self { text, quoted }
    }
}

/// Tokenize a single line. Returns an empty vector for blank and
/// comment-only lines.
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut parts: Vec<Token> = Vec::new();
    let mut current = String::new();
    let mut last_was_whitespace = true;
    let mut last_was_backslash = false;
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == '"' && !last_was_backslash {
            if last_was_whitespace && !in_quotes {
                parts.push(Token::new(std::mem::take(&mut current), false));
                in_quotes = true;
            } else if in_quotes {
                parts.push(Token::new(std::mem::take(&mut current), true));
                in_quotes = false;
            } else {
                current.push(ch);
            }
        } else if (ch == ' ' || ch == '\t') && !in_quotes {
            parts.push(Token::new(std::mem::take(&mut current), false));
        } else if ch == '#' && !in_quotes {
            if last_was_backslash {
                current.push('#');
            } else {
                break;
            }
        } else if last_was_backslash {
            match ch {
                't' => current.push('\t'),
                '"' => current.push('"'),
                'n' => current.push('\n'),
                // A sigil that is not the first character of a token has no
                // special meaning; keep the backslash as a protection
                // marker until address/variable resolution has run.
                '@' => current.push_str("\\@"),
                '$' => current.push_str("\\$"),
                '\\' => current.push_str("\\\\"),
                _ => {}
            }
        } else if ch != '\\' {
            current.push(ch);
        }

        last_was_whitespace = ch == ' ' || (ch == '\t' && !in_quotes);
        last_was_backslash = !last_was_backslash && ch == '\\';
    }
    // An unterminated quote still yields its partial token, flagged quoted.
    parts.push(Token::new(current, in_quotes));

    parts
        .into_iter()
        .filter(|p| !p.text.is_empty() || p.quoted)
        .collect()
}

/// Strip the `\@`/`\$`/`\\` protection markers left by [`tokenize`],
/// yielding the literal text. Run once per parameter after address
/// resolution.
pub fn unescape_markers(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_backslash = false;
    for c in s.chars() {
        if last_was_backslash && c == '\\' {
            out.push('\\');
        } else if c != '\\' {
            out.push(c);
        }
        last_was_backslash = c == '\\' && !last_was_backslash;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &str) -> Vec<String> {
        tokenize(line).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(texts("a b\tc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn collapses_runs_of_whitespace() {
        assert_eq!(texts("  a   b  "), vec!["a", "b"]);
    }

    #[test]
    fn empty_line_yields_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t  ").is_empty());
    }

    #[test]
    fn comment_truncates_line() {
        assert_eq!(texts("a b # c d"), vec!["a", "b"]);
        assert!(tokenize("# whole line").is_empty());
    }

    #[test]
    fn escaped_hash_is_literal() {
        assert_eq!(texts("a \\# b"), vec!["a", "#", "b"]);
    }

    #[test]
    fn quoted_token_keeps_spaces() {
        let tokens = tokenize("name \"hello world\"");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "name");
        assert!(!tokens[0].quoted);
        assert_eq!(tokens[1].text, "hello world");
        assert!(tokens[1].quoted);
    }

    #[test]
    fn empty_quoted_token_is_preserved() {
        let tokens = tokenize("key \"\"");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "");
        assert!(tokens[1].quoted);
    }

    #[test]
    fn hash_inside_quotes_is_literal() {
        assert_eq!(texts("v \"a # b\""), vec!["v", "a # b"]);
    }

    #[test]
    fn escape_sequences() {
        assert_eq!(texts("a\\tb"), vec!["a\tb"]);
        assert_eq!(texts("a\\nb"), vec!["a\nb"]);
        assert_eq!(texts("a\\\"b"), vec!["a\"b"]);
    }

    #[test]
    fn escaped_sigils_keep_protection_marker() {
        assert_eq!(texts("x\\@y"), vec!["x\\@y"]);
        assert_eq!(texts("x\\$y"), vec!["x\\$y"]);
    }

    #[test]
    fn double_backslash_keeps_marker_pair() {
        assert_eq!(texts("a\\\\b"), vec!["a\\\\b"]);
    }

    #[test]
    fn unknown_escape_is_dropped() {
        assert_eq!(texts("a\\qb"), vec!["ab"]);
    }

    #[test]
    fn unterminated_quote_yields_partial_token() {
        let tokens = tokenize("a \"unfinished");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "unfinished");
        assert!(tokens[1].quoted);
    }

    #[test]
    fn unescape_restores_literals() {
        assert_eq!(unescape_markers("x\\@y"), "x@y");
        assert_eq!(unescape_markers("x\\$y"), "x$y");
        assert_eq!(unescape_markers("a\\\\b"), "a\\b");
        assert_eq!(unescape_markers("plain"), "plain");
    }

    #[test]
    fn rejoin_and_retokenize_is_stable() {
        // Quoting aside, joining tokens with single spaces and tokenizing
        // again must reproduce the token texts.
        for line in ["a b c", "  x   y ", "one", "a b\tc  d"] {
            let first = texts(line);
            let rejoined = first.join(" ");
            assert_eq!(texts(&rejoined), first, "line: {line:?}");
        }
    }
}
