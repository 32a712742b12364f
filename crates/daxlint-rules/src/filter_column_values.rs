//! Rule to filter column values without iterating a whole table.
//!
//! Flags `FILTER('T', 'T'[c] ...)` nested in `CALCULATE`/`CALCULATETABLE`.
//! A plain boolean filter (`'T'[c] = "x"`) or `KEEPFILTERS('T'[c] = "x")`
//! works on the column alone.
//!
//! # Limitation
//!
//! Only the first matching `FILTER` of each aggregation call is reported.

use daxlint_core::{Builtin, RuleDescriptor, Severity, TextPatternRule, TokenKind};

/// Rule id for filter-column-values.
pub const ID: &str = "FILTER_COLUMN_VALUES";

/// Metadata for filter-column-values.
pub static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    id: ID,
    name: "[DAX Expressions] Filter column values with proper syntax",
    description: "Prefer KEEPFILTERS('Table'[Column] = \"Value\") or 'Table'[Column] = \
                  \"Value\" over FILTER('Table', 'Table'[Column] = \"Value\").",
    severity: Severity::Warning,
    category: "DAX Expressions",
    short_name: "Filter column values with proper syntax",
};

const OVER_TABLE: &str =
    r"(?is)\bCALCULATE(?:TABLE)?\s*\(.*?(?P<target>\bFILTER)\s*\(\s*{table}\s*,\s*{table}\s*{column}";

const OVER_ALL_TABLE: &str = r"(?is)\bCALCULATE(?:TABLE)?\s*\(.*?(?P<target>\bFILTER)\s*\(\s*ALL\s*\(\s*{table}\s*\)\s*,\s*{table}\s*{column}";

/// Creates a new filter-column-values rule.
#[must_use]
pub fn new_filter_column_values() -> TextPatternRule {
    TextPatternRule::new(&DESCRIPTOR, TokenKind::Function(Builtin::Filter))
        .anchor(TokenKind::Function(Builtin::Calculate))
        .anchor(TokenKind::Function(Builtin::CalculateTable))
        .pattern(OVER_TABLE)
        .pattern(OVER_ALL_TABLE)
}
