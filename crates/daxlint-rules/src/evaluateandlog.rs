//! Rule to keep `EVALUATEANDLOG()` out of production models.
//!
//! `EVALUATEANDLOG` is a development aid that emits trace events for every
//! evaluation. Reported at info level.

use daxlint_core::{Builtin, RuleDescriptor, Severity, TokenKind, TokenPatternRule};

/// Rule id for evaluateandlog.
pub const ID: &str = "EVALUATEANDLOG_SHOULD_NOT_BE_USED_IN_PRODUCTION_MODELS";

/// Metadata for evaluateandlog.
pub static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    id: ID,
    name: "[DAX Expressions] The EVALUATEANDLOG function should not be used in production \
           models",
    description: "The EVALUATEANDLOG function is meant for development/test environments \
                  and should not be used in production models.",
    severity: Severity::Info,
    category: "DAX Expressions",
    short_name: "EVALUATEANDLOG should not be used in production models",
};

/// Creates a new evaluateandlog rule.
#[must_use]
pub fn new_evaluateandlog() -> TokenPatternRule {
    TokenPatternRule::new(&DESCRIPTOR).flag(TokenKind::Function(Builtin::EvaluateAndLog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use daxlint_core::{tokenize, ExpressionContext, Rule, Token};

    fn check_code(code: &str) -> Vec<Token> {
        let tokens = tokenize(code);
        let ctx = ExpressionContext::new(code, &tokens);
        new_evaluateandlog().check(&ctx)
    }

    #[test]
    fn test_detects_each_call() {
        let violators = check_code("EVALUATEANDLOG([Measure1]) + EVALUATEANDLOG([Measure2])");
        assert_eq!(violators.len(), 2);
        assert_eq!(violators[1].start, 29);
    }

    #[test]
    fn test_severity_is_info() {
        assert_eq!(new_evaluateandlog().default_severity(), Severity::Info);
    }

    #[test]
    fn test_allows_plain_expression() {
        assert!(check_code("[Measure1] + [Measure2]").is_empty());
    }
}
