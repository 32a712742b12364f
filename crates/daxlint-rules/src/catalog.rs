//! The ordered catalog of built-in rules.

use crate::one_minus_division::AvoidOneMinusDivision;
use crate::unused_variables::UnusedVariables;
use crate::{
    avoid_iferror, evaluateandlog, filter_column_values, filter_measure_values,
    one_minus_division, unused_variables, use_divide, use_treatas,
};
use daxlint_core::{Config, RuleBox};

/// Version of the catalog. Bumped whenever a rule is added.
pub const CATALOG_VERSION: u32 = 8;

/// Rule ids in catalog order.
#[must_use]
pub fn rule_ids() -> [&'static str; 8] {
    [
        use_divide::ID,
        avoid_iferror::ID,
        use_treatas::ID,
        filter_column_values::ID,
        filter_measure_values::ID,
        unused_variables::ID,
        one_minus_division::ID,
        evaluateandlog::ID,
    ]
}

/// Returns every built-in rule with default settings, in catalog order.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    rules_from_config(&Config::default())
}

/// Returns every built-in rule, applying rule options from `config`.
///
/// Enabled flags and severity overrides are applied by the analyzer, not
/// here, so the result always holds the full catalog.
#[must_use]
pub fn rules_from_config(config: &Config) -> Vec<RuleBox> {
    let one_minus = config
        .rule(one_minus_division::ID)
        .map_or_else(AvoidOneMinusDivision::new, AvoidOneMinusDivision::from_config);

    vec![
        Box::new(use_divide::new_use_divide()),
        Box::new(avoid_iferror::new_avoid_iferror()),
        Box::new(use_treatas::new_use_treatas()),
        Box::new(filter_column_values::new_filter_column_values()),
        Box::new(filter_measure_values::new_filter_measure_values()),
        Box::new(UnusedVariables::new()),
        Box::new(one_minus),
        Box::new(evaluateandlog::new_evaluateandlog()),
    ]
}
