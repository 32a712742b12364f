//! Owned analysis of one DAX expression.

use daxlint_core::{
    canonical_text, classify, extract_comment_spans, report, tokenize, Analyzer, AnalysisReport,
    ArtifactReference, Builtin, CommentSpan, Config, ExpressionContext, NamedReference,
    ReferenceSet, RelationshipReference, RuleOutcome, Token, TokenKind, Variable,
};
use daxlint_rules::{all_rules, rule_ids, rules_from_config, CATALOG_VERSION};
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Analyzer over the full built-in catalog with default settings.
pub(crate) fn default_analyzer() -> &'static Analyzer {
    static ANALYZER: OnceLock<Analyzer> = OnceLock::new();
    ANALYZER.get_or_init(|| Analyzer::builder().rules(all_rules()).build())
}

/// A DAX expression together with everything derived from it.
///
/// The token array is materialized once and never changes; comments,
/// references, variables and rule outcomes are all computed from it.
///
/// # Example
///
/// ```ignore
/// use daxlint::DaxExpression;
///
/// let expr = DaxExpression::new("VAR x = 1 / 0 RETURN 2");
/// assert_eq!(expr.total_violations(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DaxExpression {
    pub(crate) source: String,
    pub(crate) tokens: Vec<Token>,
    pub(crate) comments: Vec<CommentSpan>,
    pub(crate) stripped: String,
    pub(crate) canonical: String,
    pub(crate) variables: Vec<Variable>,
    pub(crate) references: ReferenceSet,
    pub(crate) outcomes: Vec<RuleOutcome>,
    pub(crate) catalog: Vec<String>,
    pub(crate) catalog_version: u32,
}

impl DaxExpression {
    /// Analyzes `source` and runs every built-in rule.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self::analyze(source, default_analyzer())
    }

    /// Analyzes `source` with rule options, enabled flags and severity
    /// overrides taken from `config`.
    #[must_use]
    pub fn with_config(source: impl Into<String>, config: &Config) -> Self {
        let analyzer = Analyzer::builder()
            .rules(rules_from_config(config))
            .config(config.clone())
            .build();
        Self::analyze(source, &analyzer)
    }

    /// Analyzes `source` and runs the rules of `analyzer`.
    #[must_use]
    pub fn analyze(source: impl Into<String>, analyzer: &Analyzer) -> Self {
        let mut expr = Self::unverified(source);
        expr.verify_with(analyzer);
        expr
    }

    /// Extracts comments, references and variables without running rules.
    #[must_use]
    pub fn unverified(source: impl Into<String>) -> Self {
        let source = source.into();
        let tokens = tokenize(&source);

        let (stripped, variables, references) = {
            let ctx = ExpressionContext::new(&source, &tokens);
            let visible: Vec<&Token> = ctx.code_and_keyword_tokens().collect();
            let references = classify(&visible, &ctx.declarations);
            (
                ctx.stripped.text,
                ctx.declarations.variables,
                references,
            )
        };
        debug!(
            "Tokenized {} bytes into {} tokens",
            source.len(),
            tokens.len()
        );

        Self {
            comments: extract_comment_spans(&tokens),
            canonical: canonical_text(&stripped),
            source,
            tokens,
            stripped,
            variables,
            references,
            outcomes: Vec::new(),
            catalog: rule_ids().iter().map(ToString::to_string).collect(),
            catalog_version: CATALOG_VERSION,
        }
    }

    /// Analyzes raw bytes. Input that is not valid UTF-8 is treated as empty.
    #[must_use]
    pub fn from_utf8(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(source) => Self::new(source),
            Err(e) => {
                warn!("Expression is not valid UTF-8, analyzing empty input: {e}");
                Self::new(String::new())
            }
        }
    }

    /// Re-runs every built-in rule, replacing prior outcomes.
    pub fn verify_best_practices(&mut self) {
        self.verify_with(default_analyzer());
    }

    /// Re-runs the rules of `analyzer`, replacing prior outcomes.
    pub fn verify_with(&mut self, analyzer: &Analyzer) {
        let ctx = ExpressionContext::new(&self.source, &self.tokens);
        self.outcomes.clear();
        self.outcomes.extend(analyzer.run(&ctx));
    }

    /// Original source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Every token, on all channels.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Comment texts in source order.
    #[must_use]
    pub fn comments(&self) -> Vec<&str> {
        self.comments.iter().map(|c| c.text.as_str()).collect()
    }

    /// Comments with their byte offsets.
    #[must_use]
    pub fn comment_spans(&self) -> &[CommentSpan] {
        &self.comments
    }

    /// Source with comments removed and whitespace kept.
    #[must_use]
    pub fn text_without_comments(&self) -> &str {
        &self.stripped
    }

    /// Comment-free source with spaces, tabs and line breaks removed.
    #[must_use]
    pub fn canonical_text(&self) -> &str {
        &self.canonical
    }

    /// Declared variables.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// All references.
    #[must_use]
    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    /// Column and measure references, qualified ones first.
    #[must_use]
    pub fn artifact_references(&self) -> &[ArtifactReference] {
        &self.references.artifacts
    }

    /// Standalone table references.
    #[must_use]
    pub fn table_references(&self) -> Vec<&NamedReference> {
        self.references.tables()
    }

    /// References to declared variables.
    #[must_use]
    pub fn variable_references(&self) -> Vec<&NamedReference> {
        self.references.variables()
    }

    /// Calls of user-defined functions.
    #[must_use]
    pub fn function_references(&self) -> Vec<&NamedReference> {
        self.references.functions()
    }

    /// Identifiers that could not be classified.
    #[must_use]
    pub fn unknown_references(&self) -> Vec<&NamedReference> {
        self.references.unknown()
    }

    /// `USERELATIONSHIP` and `CROSSFILTER` arguments.
    #[must_use]
    pub fn relationship_references(&self) -> &[RelationshipReference] {
        &self.references.relationships
    }

    /// Text of every bracketed column or measure token.
    #[must_use]
    pub fn columns_and_measures(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .filter(|t| t.kind == TokenKind::ColumnOrMeasure)
            .map(|t| t.text.as_str())
            .collect()
    }

    /// Returns true if a token of `kind` occurs outside comments.
    #[must_use]
    pub fn contains(&self, kind: TokenKind) -> bool {
        self.tokens.iter().any(|t| t.is_code() && t.kind == kind)
    }

    /// Returns true if `builtin` is called outside comments.
    #[must_use]
    pub fn contains_function(&self, builtin: Builtin) -> bool {
        self.tokens.iter().any(|t| t.is_code() && t.is_builtin(builtin))
    }

    /// Outcomes in catalog order.
    #[must_use]
    pub fn rule_outcomes(&self) -> &[RuleOutcome] {
        &self.outcomes
    }

    /// Outcome of one rule.
    #[must_use]
    pub fn rule(&self, rule_id: &str) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|o| o.rule.id == rule_id)
    }

    /// Returns true once rules have run.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|o| o.verified)
    }

    /// Sum of violator counts over all rules.
    #[must_use]
    pub fn total_violations(&self) -> usize {
        self.outcomes.iter().map(RuleOutcome::number_of_violations).sum()
    }

    /// Report of the violated rules.
    #[must_use]
    pub fn report(&self) -> AnalysisReport {
        report(&self.outcomes)
    }

    /// Version of the rule catalog the outcomes were produced with.
    #[must_use]
    pub fn catalog_version(&self) -> u32 {
        self.catalog_version
    }
}

impl fmt::Display for DaxExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
