//! Core analyzer for orchestrating rule execution.

use crate::config::Config;
use crate::context::ExpressionContext;
use crate::rule::{Rule, RuleBox};
use crate::token::Token;
use crate::types::{AnalysisReport, RuleReport, Severity, Violator};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Owned copy of a rule's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleInfo {
    /// Stable rule id.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Short label.
    pub short_name: String,
}

impl RuleInfo {
    fn of(rule: &dyn Rule) -> Self {
        let d = rule.descriptor();
        Self {
            id: d.id.to_string(),
            name: d.name.to_string(),
            description: d.description.to_string(),
            category: d.category.to_string(),
            short_name: d.short_name.to_string(),
        }
    }
}

/// Result of one rule on one expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Rule metadata.
    pub rule: RuleInfo,
    /// Effective severity after configuration overrides.
    pub severity: Severity,
    /// Whether the rule has been run.
    pub verified: bool,
    /// Offending tokens in source order.
    pub violators: Vec<Token>,
}

impl RuleOutcome {
    /// Creates an outcome for a rule that has not run yet.
    #[must_use]
    pub fn pending(rule: &dyn Rule, severity: Severity) -> Self {
        Self {
            rule: RuleInfo::of(rule),
            severity,
            verified: false,
            violators: Vec::new(),
        }
    }

    /// Returns true if the rule found violators.
    #[must_use]
    pub fn violated(&self) -> bool {
        !self.violators.is_empty()
    }

    /// Number of violators.
    #[must_use]
    pub fn number_of_violations(&self) -> usize {
        self.violators.len()
    }

    /// Drops prior results.
    pub fn clear(&mut self) {
        self.violators.clear();
        self.verified = false;
    }

    /// Converts the outcome into a report entry.
    #[must_use]
    pub fn to_report(&self) -> RuleReport {
        RuleReport {
            rule_id: self.rule.id.clone(),
            name: self.rule.name.clone(),
            category: self.rule.category.clone(),
            short_name: self.rule.short_name.clone(),
            severity: self.severity,
            violators: self.violators.iter().map(Violator::from).collect(),
        }
    }
}

impl std::fmt::Display for RuleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - Verified: {}, Violations: {}",
            self.rule.name,
            self.verified,
            self.violators.len()
        )
    }
}

/// Builds an [`AnalysisReport`] from outcomes, keeping their order.
#[must_use]
pub fn report(outcomes: &[RuleOutcome]) -> AnalysisReport {
    let mut report = AnalysisReport::new();
    for outcome in outcomes {
        report.push(outcome.to_report());
    }
    report
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules, keeping their order.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    #[must_use]
    pub fn build(self) -> Analyzer {
        Analyzer {
            rules: self.rules,
            config: self.config.unwrap_or_default(),
        }
    }
}

/// Runs an ordered set of rules against expressions.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    rules: Vec<RuleBox>,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the ids of the enabled rules, in order.
    #[must_use]
    pub fn enabled_rule_ids(&self) -> Vec<&'static str> {
        self.rules
            .iter()
            .map(|r| r.id())
            .filter(|id| self.config.is_rule_enabled(id))
            .collect()
    }

    /// Runs every enabled rule once and returns their outcomes in order.
    #[must_use]
    pub fn run(&self, ctx: &ExpressionContext) -> Vec<RuleOutcome> {
        self.run_where(ctx, |_| true)
    }

    /// Runs the enabled rules accepted by `select`.
    #[must_use]
    pub fn run_where(
        &self,
        ctx: &ExpressionContext,
        select: impl Fn(&str) -> bool,
    ) -> Vec<RuleOutcome> {
        info!("Starting analysis of {} tokens", ctx.tokens.len());

        let mut outcomes = Vec::new();
        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.id()) {
                debug!("Skipping disabled rule: {}", rule.id());
                continue;
            }
            if !select(rule.id()) {
                continue;
            }
            outcomes.push(self.verify(rule.as_ref(), ctx));
        }

        info!(
            "Analysis complete: {} violations from {} rules",
            outcomes.iter().map(RuleOutcome::number_of_violations).sum::<usize>(),
            outcomes.len()
        );
        outcomes
    }

    /// Runs one rule and applies its severity override.
    fn verify(&self, rule: &dyn Rule, ctx: &ExpressionContext) -> RuleOutcome {
        let severity = self
            .config
            .rule_severity(rule.id())
            .unwrap_or_else(|| rule.default_severity());
        let mut outcome = RuleOutcome::pending(rule, severity);
        outcome.violators = rule.check(ctx);
        outcome.verified = true;
        debug!("{}: {} violation(s)", rule.id(), outcome.violators.len());
        outcome
    }
}
