//! Rule to avoid `IFERROR()`.
//!
//! `IFERROR` forces the engine into a slower evaluation path. For
//! divide-by-zero, `DIVIDE` already returns blank or a chosen alternate.

use daxlint_core::{Builtin, RuleDescriptor, Severity, TokenKind, TokenPatternRule};

/// Rule id for avoid-iferror.
pub const ID: &str = "AVOID_USING_THE_IFERROR_FUNCTION";

/// Metadata for avoid-iferror.
pub static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    id: ID,
    name: "[DAX Expressions] Avoid using the IFERROR function",
    description: "Avoid using the IFERROR function as it may cause performance \
                  degradation. If you are concerned about a divide-by-zero error, use \
                  the DIVIDE function as it naturally resolves such errors as blank (or \
                  you can customize what should be shown in case of such an \
                  error).\nReference: https://www.elegantbi.com/post/top10bestpractices",
    severity: Severity::Warning,
    category: "DAX Expressions",
    short_name: "Avoid IFERROR",
};

/// Creates a new avoid-iferror rule.
#[must_use]
pub fn new_avoid_iferror() -> TokenPatternRule {
    TokenPatternRule::new(&DESCRIPTOR).flag(TokenKind::Function(Builtin::IfError))
}
