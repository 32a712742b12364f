//! Rule to avoid `1 - (x / y)` and `1 + (x / y)`.
//!
//! These forms usually rewrite to a single `DIVIDE` over precomputed
//! variables. A literal exactly equal to one, followed by `+` or `-`, with a
//! `/` shortly after, is reported at the operator.
//!
//! # Configuration
//!
//! - `lookahead`: number of tokens after the operator searched for `/`
//!   (default: 10)

use daxlint_core::{ExpressionContext, Rule, RuleConfig, RuleDescriptor, Severity, Token, TokenKind};

/// Rule id for one-minus-division.
pub const ID: &str = "AVOID_USING_'1-(X/Y)'_SYNTAX";

/// Metadata for one-minus-division.
pub static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    id: ID,
    name: "[DAX Expressions] Avoid using '1-(x/y)' syntax",
    description: "Avoid 1 - (x / y) or 1 + (x / y) patterns; prefer DIVIDE and variable \
                  precomputation.",
    severity: Severity::Warning,
    category: "DAX Expressions",
    short_name: "Avoid 1-(X/Y) syntax",
};

/// Default lookahead window.
pub const DEFAULT_LOOKAHEAD: usize = 10;

/// Flags `1 +/- ... / ...` within a short token window.
#[derive(Debug, Clone)]
pub struct AvoidOneMinusDivision {
    /// Tokens after the operator searched for a division.
    pub lookahead: usize,
}

impl Default for AvoidOneMinusDivision {
    fn default() -> Self {
        Self::new()
    }
}

impl AvoidOneMinusDivision {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }

    /// Sets the lookahead window.
    #[must_use]
    pub fn lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Creates a rule from its configuration section.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        let default = i64::try_from(DEFAULT_LOOKAHEAD).unwrap_or(i64::MAX);
        let lookahead = usize::try_from(config.get_int("lookahead", default))
            .unwrap_or(DEFAULT_LOOKAHEAD);
        Self::new().lookahead(lookahead)
    }
}

fn is_one(token: &Token) -> bool {
    token.kind.is_numeric_literal()
        && token
            .text
            .trim()
            .parse::<f64>()
            .is_ok_and(|v| (v - 1.0).abs() < f64::EPSILON)
}

impl Rule for AvoidOneMinusDivision {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &DESCRIPTOR
    }

    fn check(&self, ctx: &ExpressionContext) -> Vec<Token> {
        let window: Vec<&Token> = ctx.code_tokens().collect();
        let n = window.len();
        let mut violators = Vec::new();

        for (i, token) in window.iter().enumerate() {
            if !is_one(token) || i + 2 >= n {
                continue;
            }
            let op = window[i + 1];
            if !matches!(op.kind, TokenKind::Plus | TokenKind::Minus) {
                continue;
            }
            let end = n.min(i + 2 + self.lookahead);
            if window[i + 2..end].iter().any(|t| t.kind == TokenKind::Div) {
                violators.push(op.clone());
            }
        }
        violators
    }
}
