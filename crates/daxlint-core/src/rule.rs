//! Rule trait for defining lint rules.

use crate::context::ExpressionContext;
use crate::token::Token;
use crate::types::Severity;

/// Static metadata of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDescriptor {
    /// Stable id used in configuration and reports.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// What the rule checks and why it matters.
    pub description: &'static str,
    /// Default severity.
    pub severity: Severity,
    /// Category label.
    pub category: &'static str,
    /// Short label for compact output.
    pub short_name: &'static str,
}

/// A lint rule over the token stream of one expression.
///
/// Rules are stateless: `check` is a pure function of the context, so one
/// instance can serve any number of expressions.
///
/// # Example
///
/// ```ignore
/// use daxlint_core::{ExpressionContext, Rule, RuleDescriptor, Severity, Token};
///
/// static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
///     id: "NO_CARET",
///     name: "Avoid the power operator",
///     description: "Use POWER() instead.",
///     severity: Severity::Info,
///     category: "DAX Expressions",
///     short_name: "No ^",
/// };
///
/// pub struct NoCaret;
///
/// impl Rule for NoCaret {
///     fn descriptor(&self) -> &'static RuleDescriptor { &DESCRIPTOR }
///
///     fn check(&self, ctx: &ExpressionContext) -> Vec<Token> {
///         ctx.code_tokens().filter(|t| t.text == "^").cloned().collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the rule's static metadata.
    fn descriptor(&self) -> &'static RuleDescriptor;

    /// Returns the rule id.
    fn id(&self) -> &'static str {
        self.descriptor().id
    }

    /// Returns the human-readable rule name.
    fn name(&self) -> &'static str {
        self.descriptor().name
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        self.descriptor().severity
    }

    /// Checks one expression and returns the offending tokens in order.
    fn check(&self, ctx: &ExpressionContext) -> Vec<Token>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
