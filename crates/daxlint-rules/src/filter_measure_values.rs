//! Rule to filter measure values by columns rather than whole tables.
//!
//! Flags `FILTER('T', [Measure] ...)` nested in `CALCULATE`/`CALCULATETABLE`.
//! Filtering `VALUES('T'[c])` or `ALL('T'[c])` iterates one column instead.
//!
//! # Limitation
//!
//! Only the first matching `FILTER` of each aggregation call is reported.

use daxlint_core::{Builtin, RuleDescriptor, Severity, TextPatternRule, TokenKind};

/// Rule id for filter-measure-values.
pub const ID: &str = "FILTER_MEASURE_VALUES_BY_COLUMNS";

/// Metadata for filter-measure-values.
pub static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    id: ID,
    name: "[DAX Expressions] Filter measure values by columns, not tables",
    description: "Prefer FILTER over VALUES/ALL('Table'[Column]) for measure filters \
                  rather than filtering entire tables.",
    severity: Severity::Warning,
    category: "DAX Expressions",
    short_name: "Filter measure values by columns",
};

const OVER_TABLE: &str =
    r"(?is)\bCALCULATE(?:TABLE)?\s*\(.*?(?P<target>\bFILTER)\s*\(\s*{table}\s*,\s*{column}";

const OVER_ALL_TABLE: &str =
    r"(?is)\bCALCULATE(?:TABLE)?\s*\(.*?(?P<target>\bFILTER)\s*\(\s*ALL\s*\(\s*{table}\s*\)\s*,\s*{column}";

/// Creates a new filter-measure-values rule.
#[must_use]
pub fn new_filter_measure_values() -> TextPatternRule {
    TextPatternRule::new(&DESCRIPTOR, TokenKind::Function(Builtin::Filter))
        .anchor(TokenKind::Function(Builtin::Calculate))
        .anchor(TokenKind::Function(Builtin::CalculateTable))
        .pattern(OVER_TABLE)
        .pattern(OVER_ALL_TABLE)
}
