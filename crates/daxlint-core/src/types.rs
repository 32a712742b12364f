//! Core types for lint violations and reports.

use crate::token::Token;
use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl Severity {
    /// Numeric level: 1 for info, 2 for warning, 3 for error.
    #[must_use]
    pub fn level(self) -> u8 {
        match self {
            Self::Info => 1,
            Self::Warning => 2,
            Self::Error => 3,
        }
    }

    /// Maps a numeric level back to a severity.
    #[must_use]
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Info),
            2 => Some(Self::Warning),
            3 => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number in characters (1-indexed).
    pub column: usize,
    /// Byte offset of the first byte.
    pub start: usize,
    /// Byte offset one past the last byte.
    pub stop: usize,
}

impl Location {
    /// Length of the span in bytes.
    #[must_use]
    pub fn length(&self) -> usize {
        self.stop - self.start
    }
}

impl From<&Token> for Location {
    fn from(token: &Token) -> Self {
        Self {
            line: token.line,
            column: token.column,
            start: token.start,
            stop: token.stop,
        }
    }
}

/// One offending token as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violator {
    /// Token text.
    pub text: String,
    /// Where it is.
    pub location: Location,
}

impl From<&Token> for Violator {
    fn from(token: &Token) -> Self {
        Self {
            text: token.text.clone(),
            location: Location::from(token),
        }
    }
}

/// All violations of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleReport {
    /// Stable rule id.
    pub rule_id: String,
    /// Human-readable rule name.
    pub name: String,
    /// Rule category.
    pub category: String,
    /// Short label.
    pub short_name: String,
    /// Effective severity.
    pub severity: Severity,
    /// Offending tokens in source order.
    pub violators: Vec<Violator>,
}

/// Converts a violator into a miette diagnostic for rich display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{rule_id}] {message}")]
pub struct ViolationDiagnostic {
    rule_id: String,
    message: String,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl ViolationDiagnostic {
    /// Builds a diagnostic for `violator` of `report`.
    #[must_use]
    pub fn new(report: &RuleReport, violator: &Violator) -> Self {
        Self {
            rule_id: report.rule_id.clone(),
            message: report.name.clone(),
            span: SourceSpan::from((violator.location.start, violator.location.length())),
            label_message: report.short_name.clone(),
        }
    }
}

/// Result of analyzing one expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Violated rules in catalog order.
    pub rules: Vec<RuleReport>,
    /// Sum of violator counts.
    pub total_violations: usize,
}

impl AnalysisReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule report, ignoring rules without violators.
    pub fn push(&mut self, report: RuleReport) {
        if report.violators.is_empty() {
            return;
        }
        self.total_violations += report.violators.len();
        self.rules.push(report);
    }

    /// Returns true if no rule was violated.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the report of one rule.
    #[must_use]
    pub fn rule(&self, rule_id: &str) -> Option<&RuleReport> {
        self.rules.iter().find(|r| r.rule_id == rule_id)
    }

    /// Returns rule reports filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&RuleReport> {
        self.rules
            .iter()
            .filter(|r| r.severity == severity)
            .collect()
    }

    /// Counts violators as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity: Severity| -> usize {
            self.by_severity(severity)
                .iter()
                .map(|r| r.violators.len())
                .sum()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Checks if any violation meets or exceeds the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.rules.iter().any(|r| r.severity >= severity)
    }

    /// Builds one diagnostic per violator.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<ViolationDiagnostic> {
        self.rules
            .iter()
            .flat_map(|r| r.violators.iter().map(|v| ViolationDiagnostic::new(r, v)))
            .collect()
    }

    /// Formats violations at or above `threshold` as a multi-line report.
    #[must_use]
    pub fn format_report(&self, threshold: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<&RuleReport> = self
            .rules
            .iter()
            .filter(|r| r.severity >= threshold)
            .collect();
        let shown: usize = failing.iter().map(|r| r.violators.len()).sum();

        let mut report = String::new();
        let _ = writeln!(report, "=== daxlint: {shown} violation(s) ===\n");

        for rule in &failing {
            let _ = writeln!(report, "{} [{}]", rule.short_name, rule.rule_id);
            let _ = writeln!(report, "  {}: {}", rule.severity, rule.name);
            for v in &rule.violators {
                let _ = writeln!(
                    report,
                    "  - '{}' at {}:{}",
                    v.text, v.location.line, v.location.column
                );
            }
            let _ = writeln!(report);
        }

        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Total: {errors} error(s), {warnings} warning(s), {infos} info(s)"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_report(rule_id: &str, severity: Severity, violators: usize) -> RuleReport {
        RuleReport {
            rule_id: rule_id.to_string(),
            name: format!("{rule_id} name"),
            category: "DAX Expressions".to_string(),
            short_name: rule_id.to_lowercase(),
            severity,
            violators: (0..violators)
                .map(|i| Violator {
                    text: "/".to_string(),
                    location: Location {
                        line: 1,
                        column: i * 4 + 3,
                        start: i * 4 + 2,
                        stop: i * 4 + 3,
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn severity_levels() {
        assert_eq!(Severity::from_level(1), Some(Severity::Info));
        assert_eq!(Severity::from_level(3), Some(Severity::Error));
        assert_eq!(Severity::from_level(0), None);
        assert_eq!(Severity::Warning.level(), 2);
        assert!(Severity::Error > Severity::Warning);
    }

    #[test]
    fn push_skips_clean_rules() {
        let mut report = AnalysisReport::new();
        report.push(make_report("A", Severity::Warning, 0));
        assert!(report.is_clean());

        report.push(make_report("B", Severity::Warning, 2));
        report.push(make_report("C", Severity::Info, 1));
        assert_eq!(report.total_violations, 3);
        assert_eq!(report.count_by_severity(), (0, 2, 1));
        assert!(report.rule("B").is_some());
        assert!(report.rule("A").is_none());
    }

    #[test]
    fn has_violations_at_threshold() {
        let mut report = AnalysisReport::new();
        report.push(make_report("A", Severity::Warning, 1));
        assert!(report.has_violations_at(Severity::Warning));
        assert!(!report.has_violations_at(Severity::Error));
    }

    #[test]
    fn format_report_filters_by_severity() {
        let mut report = AnalysisReport::new();
        report.push(make_report("A", Severity::Warning, 2));
        report.push(make_report("B", Severity::Info, 1));

        let text = report.format_report(Severity::Warning);
        assert!(text.contains("2 violation(s)"));
        assert!(text.contains("a [A]"));
        assert!(!text.contains("b [B]"));
        assert!(text.contains("Total: 0 error(s), 2 warning(s), 1 info(s)"));
    }

    #[test]
    fn diagnostics_carry_spans() {
        let mut report = AnalysisReport::new();
        report.push(make_report("A", Severity::Warning, 2));
        let diagnostics = report.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].to_string(), "[A] A name");
    }
}
