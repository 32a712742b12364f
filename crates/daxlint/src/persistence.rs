//! JSON snapshots of analyzed expressions.
//!
//! A snapshot stores the source and everything derived from it except the
//! token array. Restoring re-tokenizes the source, keeps the stored outcome
//! of every rule the current catalog still knows, and runs the catalog rules
//! the snapshot was taken without.
//!
//! Comments, stripped texts, variables and references are written for
//! readers of the JSON only. Restoring recomputes them from the source, so
//! stored values never override what the source says.

use crate::expression::{default_analyzer, DaxExpression};
use daxlint_core::{
    canonical_text, classify, extract_comment_spans, tokenize, CommentSpan, ExpressionContext,
    ReferenceSet, RuleOutcome, Token, Variable,
};
use daxlint_rules::{rule_ids, CATALOG_VERSION};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Snapshot persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The expression could not be encoded.
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// The snapshot could not be decoded.
    #[error("Failed to decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Snapshot {
    source: String,
    // Output only: recomputed from `source` on restore.
    comments: Vec<CommentSpan>,
    text_without_comments: String,
    canonical_text: String,
    variables: Vec<Variable>,
    references: ReferenceSet,
    // Input: kept for every rule the catalog still has.
    outcomes: Vec<RuleOutcome>,
    catalog: Vec<String>,
    catalog_version: u32,
}

impl DaxExpression {
    /// Encodes the expression as a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, PersistError> {
        let snapshot = Snapshot {
            source: self.source.clone(),
            comments: self.comments.clone(),
            text_without_comments: self.stripped.clone(),
            canonical_text: self.canonical.clone(),
            variables: self.variables.clone(),
            references: self.references.clone(),
            outcomes: self.outcomes.clone(),
            catalog: self.catalog.clone(),
            catalog_version: self.catalog_version,
        };
        serde_json::to_string(&snapshot).map_err(PersistError::Encode)
    }

    /// Restores an expression from a JSON snapshot.
    ///
    /// Fields missing from the snapshot take their defaults, so snapshots
    /// written by older catalogs load and are brought up to date.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Decode`] if the JSON does not describe a
    /// snapshot.
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        let snapshot: Snapshot = serde_json::from_str(json).map_err(PersistError::Decode)?;
        let source = snapshot.source;
        let tokens = tokenize(&source);

        let missing: Vec<&'static str> = rule_ids()
            .into_iter()
            .filter(|id| !snapshot.catalog.iter().any(|known| known.as_str() == *id))
            .collect();

        let (stripped, variables, references, fresh) = {
            let ctx = ExpressionContext::new(&source, &tokens);
            let visible: Vec<&Token> = ctx.code_and_keyword_tokens().collect();
            let references = classify(&visible, &ctx.declarations);
            let fresh = if missing.is_empty() {
                Vec::new()
            } else {
                info!(
                    "Upgrading snapshot from catalog v{} to v{}: running {} rule(s)",
                    snapshot.catalog_version,
                    CATALOG_VERSION,
                    missing.len()
                );
                default_analyzer().run_where(&ctx, |id| missing.iter().any(|m| *m == id))
            };
            (
                ctx.stripped.text,
                ctx.declarations.variables,
                references,
                fresh,
            )
        };

        let outcomes = merge_outcomes(snapshot.outcomes, fresh);

        Ok(Self {
            comments: extract_comment_spans(&tokens),
            canonical: canonical_text(&stripped),
            source,
            tokens,
            stripped,
            variables,
            references,
            outcomes,
            catalog: rule_ids().iter().map(ToString::to_string).collect(),
            catalog_version: CATALOG_VERSION,
        })
    }
}

/// Orders stored and freshly computed outcomes by catalog position and drops
/// outcomes of rules the catalog no longer has.
fn merge_outcomes(stored: Vec<RuleOutcome>, fresh: Vec<RuleOutcome>) -> Vec<RuleOutcome> {
    let mut pool: Vec<RuleOutcome> = stored.into_iter().chain(fresh).collect();
    let mut merged = Vec::with_capacity(pool.len());
    for id in rule_ids() {
        if let Some(pos) = pool.iter().position(|o| o.rule.id == id) {
            merged.push(pool.swap_remove(pos));
        }
    }
    for dropped in &pool {
        debug!("Dropping outcome of unknown rule: {}", dropped.rule.id);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use daxlint_rules::{unused_variables, use_divide};

    #[test]
    fn test_snapshot_has_no_token_array() {
        let json = DaxExpression::new("1 / 0").to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("tokens").is_none());
        assert_eq!(value["source"], "1 / 0");
        assert_eq!(value["catalog_version"], CATALOG_VERSION);
    }

    #[test]
    fn test_decode_error() {
        let err = DaxExpression::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, PersistError::Decode(_)));
        assert!(err.to_string().starts_with("Failed to decode snapshot"));
    }

    #[test]
    fn test_merge_keeps_catalog_order() {
        let expr = DaxExpression::new("VAR x = 1 / 0 RETURN 2");
        let mut outcomes = expr.rule_outcomes().to_vec();
        let divide = outcomes.remove(0);

        let merged = merge_outcomes(outcomes, vec![divide]);
        assert_eq!(merged[0].rule.id, use_divide::ID);
        assert_eq!(merged.len(), rule_ids().len());
    }

    #[test]
    fn test_merge_drops_unknown_rules() {
        let expr = DaxExpression::new("VAR x = 1 RETURN 2");
        let mut outcomes = expr.rule_outcomes().to_vec();
        let mut retired = outcomes[0].clone();
        retired.rule.id = "RETIRED_RULE".to_string();
        outcomes.push(retired);

        let merged = merge_outcomes(outcomes, Vec::new());
        assert_eq!(merged.len(), rule_ids().len());
        assert!(merged.iter().any(|o| o.rule.id == unused_variables::ID));
    }
}
