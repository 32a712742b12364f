//! Rule to prefer `TREATAS()` over `INTERSECT()` for virtual relationships.

use daxlint_core::{Builtin, RuleDescriptor, Severity, TokenKind, TokenPatternRule};

/// Rule id for use-treatas.
pub const ID: &str = "USE_THE_TREATAS_FUNCTION_INSTEAD_OF_INTERSECT";

/// Metadata for use-treatas.
pub static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    id: ID,
    name: "[DAX Expressions] Use the TREATAS function instead of INTERSECT for virtual \
           relationships",
    description: "The TREATAS function is more efficient and provides better performance \
                  than the INTERSECT function when used in virtual relationships.",
    severity: Severity::Warning,
    category: "DAX Expressions",
    short_name: "Use TREATAS instead of INTERSECT",
};

/// Creates a new use-treatas rule.
#[must_use]
pub fn new_use_treatas() -> TokenPatternRule {
    TokenPatternRule::new(&DESCRIPTOR).flag(TokenKind::Function(Builtin::Intersect))
}
