//! Context types for rule execution.

use crate::comments::StrippedSource;
use crate::token::{Channel, Token, TokenKind};
use crate::variables::{detect_variables, Declarations};

/// Everything a rule may look at for one expression.
///
/// Built once per expression; rules only borrow it.
#[derive(Debug, Clone)]
pub struct ExpressionContext<'a> {
    /// Original source text.
    pub source: &'a str,
    /// Full token stream, all channels.
    pub tokens: &'a [Token],
    /// Comment-free text with its offset map.
    pub stripped: StrippedSource,
    /// Variable declarations.
    pub declarations: Declarations,
}

impl<'a> ExpressionContext<'a> {
    /// Creates a context over an already tokenized expression.
    #[must_use]
    pub fn new(source: &'a str, tokens: &'a [Token]) -> Self {
        let visible: Vec<&Token> = tokens
            .iter()
            .filter(|t| matches!(t.channel, Channel::Code | Channel::Keyword))
            .collect();
        Self {
            source,
            tokens,
            stripped: StrippedSource::new(tokens),
            declarations: detect_variables(&visible),
        }
    }

    /// Tokens on the code channel.
    pub fn code_tokens(&self) -> impl Iterator<Item = &'a Token> {
        let tokens = self.tokens;
        tokens.iter().filter(|t| t.channel == Channel::Code)
    }

    /// Tokens on the code and keyword channels.
    pub fn code_and_keyword_tokens(&self) -> impl Iterator<Item = &'a Token> {
        let tokens = self.tokens;
        tokens
            .iter()
            .filter(|t| matches!(t.channel, Channel::Code | Channel::Keyword))
    }

    /// Returns true if a code or keyword token of `kind` is present.
    #[must_use]
    pub fn contains_kind(&self, kind: TokenKind) -> bool {
        self.code_and_keyword_tokens().any(|t| t.kind == kind)
    }
}
