//! Rule to flag variables that are declared but never read.
//!
//! Names compare case-insensitively. Scoping is lexical only: a name that
//! is reused in an unrelated binding counts as a use, and a redeclared name
//! is reported at its last declaration.

use daxlint_core::{clean_name, ExpressionContext, Rule, RuleDescriptor, Severity, Token};
use tracing::trace;

/// Rule id for unused-variables.
pub const ID: &str = "UNUSED_VARIABLES";

/// Metadata for unused-variables.
pub static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    id: ID,
    name: "[DAX Expressions] Unused variables",
    description: "Flags variables declared with VAR that are never referenced in the \
                  expression.",
    severity: Severity::Warning,
    category: "DAX Expressions",
    short_name: "Unused variable",
};

/// Flags `VAR` declarations whose name is never referenced.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnusedVariables;

impl UnusedVariables {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for UnusedVariables {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &DESCRIPTOR
    }

    fn check(&self, ctx: &ExpressionContext) -> Vec<Token> {
        // Lower-cased name -> declaration token, in first-declaration order.
        let mut declared: Vec<(String, &Token)> = Vec::new();
        for variable in &ctx.declarations.variables {
            let key = variable.name.to_lowercase();
            match declared.iter_mut().find(|(name, _)| *name == key) {
                Some(entry) => entry.1 = &variable.token,
                None => declared.push((key, &variable.token)),
            }
        }
        if declared.is_empty() {
            return Vec::new();
        }

        let mut used = vec![false; declared.len()];
        for token in ctx.code_tokens().filter(|t| t.kind.is_identifier()) {
            let key = clean_name(&token.text).to_lowercase();
            if let Some(pos) = declared.iter().position(|(name, _)| *name == key) {
                if !declared[pos].1.same_as(token) {
                    used[pos] = true;
                }
            }
        }

        declared
            .into_iter()
            .zip(used)
            .filter(|(_, used)| !used)
            .map(|((name, token), _)| {
                trace!("Unused variable: {name}");
                token.clone()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daxlint_core::tokenize;

    fn check_code(code: &str) -> Vec<Token> {
        let tokens = tokenize(code);
        let ctx = ExpressionContext::new(code, &tokens);
        UnusedVariables::new().check(&ctx)
    }

    fn names(code: &str) -> Vec<String> {
        check_code(code).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_detects_unused() {
        assert_eq!(names("VAR x = 1 RETURN 2"), vec!["x"]);
    }

    #[test]
    fn test_allows_used() {
        assert!(check_code("VAR x = 1 RETURN x").is_empty());
    }

    #[test]
    fn test_use_is_case_insensitive() {
        assert!(check_code("VAR Total = 1 RETURN total").is_empty());
    }

    #[test]
    fn test_chained_variables() {
        assert!(check_code("VAR x = COUNTROWS(DimCustomer) VAR y = x + 1 RETURN y").is_empty());
    }

    #[test]
    fn test_reports_in_declaration_order() {
        let code = "VAR UnusedVar1 = 123\n\
                    VAR SalesPerCustomer = SUM(factCopy[temp_c]) / COUNTROWS(VALUES(dimCities[Kanton]))\n\
                    VAR UnusedVar2 = IFERROR(SUM(factWeather[temp_c]), 0)\n\
                    RETURN\n\
                    CALCULATE([Measure displayed charts], FILTER(factWeather, [t] > 20))";
        assert_eq!(
            names(code),
            vec!["UnusedVar1", "SalesPerCustomer", "UnusedVar2"]
        );
    }

    #[test]
    fn test_ignores_names_in_strings_and_comments() {
        assert_eq!(names("VAR x = 1 // x\nRETURN \"x\""), vec!["x"]);
    }

    #[test]
    fn test_no_declarations() {
        assert!(check_code("SUM('T'[a])").is_empty());
    }
}
