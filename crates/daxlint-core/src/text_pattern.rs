//! Structural rules matched over comment-free text.
//!
//! Some checks need more context than one token, for example "a `FILTER`
//! whose arguments are a bare table and a column, nested in `CALCULATE`".
//! Without a parse tree these run as regular expressions over the stripped
//! text. Each match must capture the group `target`; the target token whose
//! stripped range lies inside that capture becomes the violator.
//!
//! Patterns may use two placeholders:
//!
//! - `{table}`: a quoted or bare table name
//! - `{column}`: a bracketed column or measure name
//!
//! With anchors set, a target only counts when it sits inside the
//! parentheses of an anchor call; a lazy match that runs past the anchor's
//! closing parenthesis is dropped.
//!
//! Matching is not deduplicated. A lazy pattern anchored on an aggregation
//! call finds at most one target per anchor, so several independent
//! occurrences inside one call are counted once.

use crate::context::ExpressionContext;
use crate::rule::{Rule, RuleDescriptor};
use crate::token::{Token, TokenKind};
use regex::Regex;
use tracing::{trace, warn};

/// Regex for a table name.
pub const TABLE: &str = r"(?:'(?:[^']|'')+'|[\p{L}_][\p{L}\p{N}_.]*)";

/// Regex for a bracketed column or measure name.
pub const COLUMN: &str = r"\[(?:[^\]]|\]\])+\]";

/// Rule that correlates text matches with target tokens.
#[derive(Debug, Clone)]
pub struct TextPatternRule {
    descriptor: &'static RuleDescriptor,
    anchors: Vec<TokenKind>,
    target: TokenKind,
    patterns: Vec<Regex>,
}

impl TextPatternRule {
    /// Creates a rule whose violators are tokens of kind `target`.
    #[must_use]
    pub fn new(descriptor: &'static RuleDescriptor, target: TokenKind) -> Self {
        Self {
            descriptor,
            anchors: Vec::new(),
            target,
            patterns: Vec::new(),
        }
    }

    /// Adds an anchor kind. With anchors set, the rule only runs if one of
    /// them appears on the code or keyword channel.
    #[must_use]
    pub fn anchor(mut self, kind: TokenKind) -> Self {
        self.anchors.push(kind);
        self
    }

    /// Adds a pattern. An invalid pattern is logged and skipped.
    #[must_use]
    pub fn pattern(mut self, template: &str) -> Self {
        let expanded = template.replace("{table}", TABLE).replace("{column}", COLUMN);
        match Regex::new(&expanded) {
            Ok(regex) => self.patterns.push(regex),
            Err(e) => warn!("Skipping invalid pattern for {}: {e}", self.descriptor.id),
        }
        self
    }

    /// Number of compiled patterns.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    fn anchored(&self, ctx: &ExpressionContext) -> bool {
        self.anchors.is_empty() || self.anchors.iter().any(|&k| ctx.contains_kind(k))
    }

    /// Stream index bounds `(open, close)` of every anchor call's parentheses.
    /// An unclosed call runs to the end of the stream.
    fn anchor_calls(&self, code: &[&Token]) -> Vec<(usize, usize)> {
        let mut calls = Vec::new();
        for (i, token) in code.iter().enumerate() {
            if !self.anchors.contains(&token.kind) {
                continue;
            }
            let Some(open) = code.get(i + 1).filter(|t| t.kind == TokenKind::OpenParens) else {
                continue;
            };
            let mut depth = 0usize;
            let mut close = usize::MAX;
            for t in &code[i + 1..] {
                match t.kind {
                    TokenKind::OpenParens => depth += 1,
                    TokenKind::CloseParens => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            close = t.index;
                            break;
                        }
                    }
                    _ => {}
                }
            }
            calls.push((open.index, close));
        }
        calls
    }
}

impl Rule for TextPatternRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        self.descriptor
    }

    fn check(&self, ctx: &ExpressionContext) -> Vec<Token> {
        if !self.anchored(ctx) {
            trace!("{}: no anchor token, skipping", self.descriptor.id);
            return Vec::new();
        }

        let code: Vec<&Token> = ctx.code_tokens().collect();
        let calls = self.anchor_calls(&code);
        let nested = |token: &Token| {
            self.anchors.is_empty()
                || calls
                    .iter()
                    .any(|&(open, close)| open < token.index && token.index < close)
        };
        let targets: Vec<&Token> = code
            .iter()
            .copied()
            .filter(|t| t.kind == self.target)
            .collect();
        let mut violators = Vec::new();

        for regex in &self.patterns {
            for caps in regex.captures_iter(&ctx.stripped.text) {
                let Some(capture) = caps.name("target") else {
                    continue;
                };
                let hit = targets.iter().find(|t| {
                    ctx.stripped
                        .range_of(t)
                        .is_some_and(|r| capture.start() <= r.start && r.end <= capture.end())
                });
                match hit {
                    Some(token) if nested(*token) => violators.push((*token).clone()),
                    Some(token) => trace!(
                        "{}: target at {} is outside every anchor call",
                        self.descriptor.id,
                        token.start
                    ),
                    None => trace!(
                        "{}: match at {} has no target token",
                        self.descriptor.id,
                        capture.start()
                    ),
                }
            }
        }

        violators.sort_by_key(|t| t.index);
        violators
    }
}
