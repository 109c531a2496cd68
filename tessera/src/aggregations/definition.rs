//! Aggregation type and parameter descriptors

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;

/// Largest `precision_threshold` the backend distinguishes; larger values act as this one.
pub const MAX_PRECISION_THRESHOLD: u64 = 40_000;

/// Validation rule attached to a parameter.
///
/// Rules are plain data; [`ParamRule::check`] is the single function that
/// interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamRule {
    /// Anything, including absence.
    Any,
    /// Name of a document field.
    FieldName,
    /// Integer `>= 0`.
    NonNegativeInteger,
    /// Number `>= 0`, fractions allowed.
    NonNegativeNumber,
    /// Non-empty list of numbers in `[0, 100]`.
    Percents,
    /// Non-empty list of numbers.
    Numbers,
    /// Calendar unit (`day`, `month`, ...) or fixed interval (`30d`, `12h`).
    Interval,
    /// Signed duration such as `+1h` or `-1M`.
    Offset,
    /// Free-form string, e.g. a date format.
    Text,
}

fn interval_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:minute|hour|day|week|month|quarter|year|1[mhdwMqy]|\d+(?:ms|s|m|h|d))$")
            .expect("interval pattern is valid")
    })
}

fn offset_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?\d+(?:ms|s|m|h|d|w|M|q|y)$").expect("offset pattern is valid")
    })
}

impl ParamRule {
    /// Check a supplied value. Returns the rejection reason on failure.
    ///
    /// Absence is handled by [`ParameterDefinition::check`]; this only sees
    /// values that were actually supplied.
    pub fn check(&self, value: &Value) -> std::result::Result<(), String> {
        let ok = match self {
            ParamRule::Any => true,
            ParamRule::FieldName => value.as_str().is_some_and(|s| !s.trim().is_empty()),
            ParamRule::NonNegativeInteger => value.as_u64().is_some(),
            ParamRule::NonNegativeNumber => value.as_f64().is_some_and(|n| n >= 0.0),
            ParamRule::Percents => non_empty_numbers(value)
                .is_some_and(|nums| nums.iter().all(|n| (0.0..=100.0).contains(n))),
            ParamRule::Numbers => non_empty_numbers(value).is_some(),
            ParamRule::Interval => value.as_str().is_some_and(|s| interval_pattern().is_match(s)),
            ParamRule::Offset => value.as_str().is_some_and(|s| offset_pattern().is_match(s)),
            ParamRule::Text => value.is_string(),
        };

        if ok {
            Ok(())
        } else {
            Err(self.expectation().to_string())
        }
    }

    fn expectation(&self) -> &'static str {
        match self {
            ParamRule::Any => "any value",
            ParamRule::FieldName => "expected a non-empty field name",
            ParamRule::NonNegativeInteger => "expected a non-negative integer",
            ParamRule::NonNegativeNumber => "expected a non-negative number",
            ParamRule::Percents => "expected a non-empty list of numbers between 0 and 100",
            ParamRule::Numbers => "expected a non-empty list of numbers",
            ParamRule::Interval => "expected a calendar unit or fixed interval such as 30d",
            ParamRule::Offset => "expected a signed duration such as +1h or -1M",
            ParamRule::Text => "expected a string",
        }
    }
}

fn non_empty_numbers(value: &Value) -> Option<Vec<f64>> {
    let items = value.as_array()?;
    if items.is_empty() {
        return None;
    }
    items.iter().map(Value::as_f64).collect()
}

/// One named option of an aggregation type.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterDefinition {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub rule: ParamRule,
    pub required: bool,
}

impl ParameterDefinition {
    /// Check the value supplied for this parameter, `None` meaning absent.
    pub fn check(&self, value: Option<&Value>) -> std::result::Result<(), String> {
        match value {
            None | Some(Value::Null) if self.required => Err("required parameter is missing".into()),
            None | Some(Value::Null) => Ok(()),
            Some(v) => self.rule.check(v),
        }
    }
}

/// A supported aggregation type.
#[derive(Debug, Clone, Serialize)]
pub struct AggregationTypeDefinition {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ParameterDefinition>,
}

impl AggregationTypeDefinition {
    pub fn parameter(&self, id: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.id == id)
    }
}
