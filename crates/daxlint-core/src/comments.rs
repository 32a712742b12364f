//! Splitting a token stream into code and comments.

use crate::token::Token;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A comment together with its byte offset in the original source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSpan {
    /// Comment text including its delimiters.
    pub text: String,
    /// Byte offset of the comment in the source.
    pub start: usize,
}

/// Returns the source with every comment token removed.
///
/// Whitespace tokens are preserved, so line structure survives.
#[must_use]
pub fn strip_comments(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|t| !t.is_comment())
        .map(|t| t.text.as_str())
        .collect()
}

/// Returns the text of every comment token, in source order.
#[must_use]
pub fn extract_comments(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| t.is_comment())
        .map(|t| t.text.clone())
        .collect()
}

/// Returns every comment with its original offset.
#[must_use]
pub fn extract_comment_spans(tokens: &[Token]) -> Vec<CommentSpan> {
    tokens
        .iter()
        .filter(|t| t.is_comment())
        .map(|t| CommentSpan {
            text: t.text.clone(),
            start: t.start,
        })
        .collect()
}

/// Removes every space, tab, carriage return and line feed.
#[must_use]
pub fn canonical_text(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\r' | '\n'))
        .collect()
}

/// Re-inserts comments into comment-free text.
///
/// `spans` must be in source order, as returned by [`extract_comment_spans`].
#[must_use]
pub fn restore_comments(stripped: &str, spans: &[CommentSpan]) -> String {
    let mut out = String::with_capacity(stripped.len());
    let mut rest = stripped;
    for span in spans {
        // Everything before this comment that is not itself a comment.
        let take = span.start.saturating_sub(out.len()).min(rest.len());
        out.push_str(&rest[..take]);
        rest = &rest[take..];
        out.push_str(&span.text);
    }
    out.push_str(rest);
    out
}

/// Comment-free text plus the position of every surviving token in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrippedSource {
    /// Comment-free text.
    pub text: String,
    ranges: Vec<Option<Range<usize>>>,
}

impl StrippedSource {
    /// Builds the stripped text and its offset map.
    #[must_use]
    pub fn new(tokens: &[Token]) -> Self {
        let mut text = String::new();
        let mut ranges = vec![None; tokens.iter().map(|t| t.index + 1).max().unwrap_or(0)];
        for token in tokens {
            if token.is_comment() {
                continue;
            }
            let start = text.len();
            text.push_str(&token.text);
            if let Some(slot) = ranges.get_mut(token.index) {
                *slot = Some(start..text.len());
            }
        }
        Self { text, ranges }
    }

    /// Byte range of `token` inside the stripped text.
    ///
    /// Returns `None` for comments and for tokens of another stream.
    #[must_use]
    pub fn range_of(&self, token: &Token) -> Option<Range<usize>> {
        self.ranges.get(token.index).cloned().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    const SOURCE: &str = "// lead comment\nCALCULATE(/* mid */[Sales])// tail";

    #[test]
    fn test_strip_comments() {
        let tokens = tokenize(SOURCE);
        assert_eq!(strip_comments(&tokens), "\nCALCULATE([Sales])");
    }

    #[test]
    fn test_extract_comments() {
        let tokens = tokenize(SOURCE);
        assert_eq!(
            extract_comments(&tokens),
            vec!["// lead comment", "/* mid */", "// tail"]
        );
    }

    #[test]
    fn test_restore_round_trip() {
        let tokens = tokenize(SOURCE);
        let spans = extract_comment_spans(&tokens);
        assert_eq!(restore_comments(&strip_comments(&tokens), &spans), SOURCE);
    }

    #[test]
    fn test_canonical_text() {
        assert_eq!(canonical_text(" SUM ( 'T'[a] )\r\n\t+ 1"), "SUM('T'[a])+1");
    }

    #[test]
    fn test_stripped_ranges() {
        let tokens = tokenize(SOURCE);
        let stripped = StrippedSource::new(&tokens);
        let sales = tokens.iter().find(|t| t.text == "[Sales]");
        let range = sales.and_then(|t| stripped.range_of(t));
        assert_eq!(range.map(|r| &stripped.text[r]), Some("[Sales]"));
        assert_eq!(stripped.range_of(&tokens[0]), None);
    }
}
