//! Single-token pattern rules.
//!
//! This module provides a builder for rules that flag every code token of
//! a given kind, such as the division operator or a discouraged function.
//!
//! # Example
//!
//! ```ignore
//! use daxlint_core::{Builtin, TokenKind, TokenPatternRule};
//!
//! let rule = TokenPatternRule::new(&DESCRIPTOR)
//!     .flag(TokenKind::Function(Builtin::IfError));
//! ```

use crate::context::ExpressionContext;
use crate::rule::{Rule, RuleDescriptor};
use crate::token::{Token, TokenKind};

/// Rule that flags every code token of the configured kinds.
#[derive(Debug, Clone)]
pub struct TokenPatternRule {
    descriptor: &'static RuleDescriptor,
    kinds: Vec<TokenKind>,
}

impl TokenPatternRule {
    /// Creates a rule that flags nothing until [`flag`](Self::flag) is called.
    #[must_use]
    pub fn new(descriptor: &'static RuleDescriptor) -> Self {
        Self {
            descriptor,
            kinds: Vec::new(),
        }
    }

    /// Adds a token kind to flag.
    #[must_use]
    pub fn flag(mut self, kind: TokenKind) -> Self {
        self.kinds.push(kind);
        self
    }

    /// Token kinds this rule flags.
    #[must_use]
    pub fn kinds(&self) -> &[TokenKind] {
        &self.kinds
    }
}

impl Rule for TokenPatternRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        self.descriptor
    }

    fn check(&self, ctx: &ExpressionContext) -> Vec<Token> {
        ctx.code_tokens()
            .filter(|t| self.kinds.contains(&t.kind))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::token::Builtin;
    use crate::types::Severity;

    static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
        id: "NO_DIVISION",
        name: "No division",
        description: "",
        severity: Severity::Warning,
        category: "Test",
        short_name: "no /",
    };

    fn check(rule: &TokenPatternRule, source: &str) -> Vec<Token> {
        let tokens = tokenize(source);
        let ctx = ExpressionContext::new(source, &tokens);
        rule.check(&ctx)
    }

    #[test]
    fn test_flags_each_token() {
        let rule = TokenPatternRule::new(&DESCRIPTOR).flag(TokenKind::Div);
        let found = check(&rule, "1 / 0 + 2 / 0");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].start, 2);
        assert_eq!(found[1].start, 10);
    }

    #[test]
    fn test_ignores_comments() {
        let rule = TokenPatternRule::new(&DESCRIPTOR).flag(TokenKind::Div);
        assert!(check(&rule, "DIVIDE(1, 0) // 1 / 0").is_empty());
    }

    #[test]
    fn test_multiple_kinds() {
        let rule = TokenPatternRule::new(&DESCRIPTOR)
            .flag(TokenKind::Function(Builtin::IfError))
            .flag(TokenKind::Function(Builtin::IsError));
        assert_eq!(rule.kinds().len(), 2);
        assert_eq!(check(&rule, "IFERROR(ISERROR(1), 0)").len(), 2);
    }
}
