//! # daxlint-rules
//!
//! Built-in best-practice rules for DAX expressions.
//!
//! ## Available Rules
//!
//! | Id | Short name | Severity |
//! |----|------------|----------|
//! | `USE_THE_DIVIDE_FUNCTION_FOR_DIVISION` | Use DIVIDE instead of / | warning |
//! | `AVOID_USING_THE_IFERROR_FUNCTION` | Avoid IFERROR | warning |
//! | `USE_THE_TREATAS_FUNCTION_INSTEAD_OF_INTERSECT` | Use TREATAS instead of INTERSECT | warning |
//! | `FILTER_COLUMN_VALUES` | Filter column values with proper syntax | warning |
//! | `FILTER_MEASURE_VALUES_BY_COLUMNS` | Filter measure values by columns | warning |
//! | `UNUSED_VARIABLES` | Unused variable | warning |
//! | `AVOID_USING_'1-(X/Y)'_SYNTAX` | Avoid 1-(X/Y) syntax | warning |
//! | `EVALUATEANDLOG_SHOULD_NOT_BE_USED_IN_PRODUCTION_MODELS` | EVALUATEANDLOG should not be used in production models | info |
//!
//! ## Usage
//!
//! ```ignore
//! use daxlint_core::Analyzer;
//! use daxlint_rules::{all_rules, UnusedVariables};
//!
//! let analyzer = Analyzer::builder().rules(all_rules()).build();
//! let only_unused = Analyzer::builder().rule(UnusedVariables::new()).build();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod avoid_iferror;
mod catalog;
pub mod evaluateandlog;
pub mod filter_column_values;
pub mod filter_measure_values;
pub mod one_minus_division;
pub mod unused_variables;
pub mod use_divide;
pub mod use_treatas;

pub use avoid_iferror::new_avoid_iferror;
pub use catalog::{all_rules, rule_ids, rules_from_config, CATALOG_VERSION};
pub use evaluateandlog::new_evaluateandlog;
pub use filter_column_values::new_filter_column_values;
pub use filter_measure_values::new_filter_measure_values;
pub use one_minus_division::AvoidOneMinusDivision;
pub use unused_variables::UnusedVariables;
pub use use_divide::new_use_divide;
pub use use_treatas::new_use_treatas;

/// Re-export core types for convenience.
pub use daxlint_core::{Rule, RuleBox, Severity};
