//! # daxlint
//!
//! Token-level analyzer and best-practice linter for DAX expressions.
//!
//! This is the main facade crate that re-exports the core framework and the
//! built-in rules, plus [`DaxExpression`], the owned analysis of one
//! expression.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use daxlint::DaxExpression;
//!
//! let expr = DaxExpression::new("CALCULATE([Sales], 'Product'[Color] = \"Red\") / 2");
//! for artifact in expr.artifact_references() {
//!     println!("{artifact}");
//! }
//! print!("{}", expr.report().format_report(daxlint::Severity::Info));
//! ```
//!
//! ## Configuration
//!
//! Rules are switched off, re-graded or tuned from a TOML file:
//!
//! ```toml
//! [rules.UNUSED_VARIABLES]
//! enabled = false
//!
//! [rules."AVOID_USING_'1-(X/Y)'_SYNTAX"]
//! severity = "error"
//! lookahead = 6
//! ```
//!
//! ```rust,ignore
//! let config = daxlint::Config::from_file("daxlint.toml".as_ref())?;
//! let expr = daxlint::DaxExpression::with_config(source, &config);
//! ```
//!
//! ## Persistence
//!
//! [`DaxExpression::to_json`] and [`DaxExpression::from_json`] store and
//! restore an analysis. Snapshots taken before a rule joined the catalog
//! have that rule run on restore.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use daxlint_core::*;

/// Built-in rules and the rule catalog.
pub mod rules {
    pub use daxlint_rules::*;
}

mod expression;
mod persistence;

pub use expression::DaxExpression;
pub use persistence::PersistError;
