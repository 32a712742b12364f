//! Rule to prefer `DIVIDE()` over the `/` operator.
//!
//! `DIVIDE` resolves divide-by-zero to blank (or a chosen alternate result),
//! while `/` raises an error. Every division operator on the code channel is
//! reported.

use daxlint_core::{RuleDescriptor, Severity, TokenKind, TokenPatternRule};

/// Rule id for use-divide.
pub const ID: &str = "USE_THE_DIVIDE_FUNCTION_FOR_DIVISION";

/// Metadata for use-divide.
pub static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    id: ID,
    name: "[DAX Expressions] Use the DIVIDE function for division",
    description: "Use the DIVIDE function instead of using \"/\". The DIVIDE function \
                  resolves divide-by-zero cases. As such, it is recommended to use to \
                  avoid errors.\n\nReference: \
                  https://docs.microsoft.com/power-bi/guidance/dax-divide-function-operator",
    severity: Severity::Warning,
    category: "DAX Expressions",
    short_name: "Use DIVIDE instead of /",
};

/// Creates a new use-divide rule.
#[must_use]
pub fn new_use_divide() -> TokenPatternRule {
    TokenPatternRule::new(&DESCRIPTOR).flag(TokenKind::Div)
}

#[cfg(test)]
mod tests {
    use super::*;
    use daxlint_core::{tokenize, ExpressionContext, Rule, Token};

    fn check_code(code: &str) -> Vec<Token> {
        let tokens = tokenize(code);
        let ctx = ExpressionContext::new(code, &tokens);
        new_use_divide().check(&ctx)
    }

    #[test]
    fn test_detects_division() {
        let violators = check_code("1 / 0");
        assert_eq!(violators.len(), 1);
        assert_eq!(violators[0].text, "/");
    }

    #[test]
    fn test_allows_divide() {
        assert!(check_code("DIVIDE(1, 0)").is_empty());
    }

    #[test]
    fn test_counts_each_operator() {
        assert_eq!(check_code("1 / 0 + 2 / 0").len(), 2);
    }

    #[test]
    fn test_ignores_commented_division() {
        assert!(check_code("DIVIDE(1, 0) /* 1 / 0 */").is_empty());
    }
}
