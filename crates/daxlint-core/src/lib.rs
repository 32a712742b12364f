//! # daxlint-core
//!
//! Core framework for linting DAX expressions without a parse tree.
//!
//! This crate provides the token-level building blocks:
//!
//! - [`tokenize`] for a total, channel-tagged token stream
//! - comment splitting and the comment-free offset map ([`StrippedSource`])
//! - [`detect_variables`] for lexical `VAR` declarations
//! - [`classify`] for typed table, column, variable and function references
//! - [`Rule`] trait plus [`TokenPatternRule`] and [`TextPatternRule`] builders
//! - [`Analyzer`] for running an ordered set of rules
//!
//! ## Example
//!
//! ```ignore
//! use daxlint_core::{tokenize, Analyzer, ExpressionContext};
//!
//! let source = "1 / 0";
//! let tokens = tokenize(source);
//! let ctx = ExpressionContext::new(source, &tokens);
//!
//! let analyzer = Analyzer::builder().rule(MyRule::new()).build();
//! let outcomes = analyzer.run(&ctx);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod comments;
mod config;
mod context;
mod lexer;
mod references;
mod rule;
mod text_pattern;
mod token;
mod token_pattern;
mod types;
mod variables;

pub use analyzer::{report, Analyzer, AnalyzerBuilder, RuleInfo, RuleOutcome};
pub use comments::{
    canonical_text, extract_comment_spans, extract_comments, restore_comments, strip_comments,
    CommentSpan, StrippedSource,
};
pub use config::{Config, ConfigError, RuleConfig};
pub use context::ExpressionContext;
pub use lexer::{tokenize, Lexer};
pub use references::{
    classify, ArtifactReference, IdentifierReference, NamedReference, ReferenceSet,
    RelationshipReference,
};
pub use rule::{Rule, RuleBox, RuleDescriptor};
pub use text_pattern::{TextPatternRule, COLUMN, TABLE};
pub use token::{Builtin, Channel, Token, TokenKind};
pub use token_pattern::TokenPatternRule;
pub use types::{AnalysisReport, Location, RuleReport, Severity, ViolationDiagnostic, Violator};
pub use variables::{clean_name, detect_variables, Declarations, Variable};
