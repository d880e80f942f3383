//! Typed, bounded algorithm parameters and their resolution
//!
//! Hosts hand the engine a flat map of raw textual values (whatever a form
//! produced). Resolution never fails: absent or unparseable values fall back
//! to the declared default, numbers are clamped into their declared bounds,
//! and choices outside the option list revert to the default option.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::execution::context::Pace;

/// Raw values keyed by parameter id, as produced by a form
pub type RawParameters = HashMap<String, String>;

/// Identifier of the speed parameter every algorithm declares
pub const SPEED: &str = "speed";

/// Delay, in milliseconds, used when no speed is supplied
pub const DEFAULT_SPEED_MS: u64 = 500;

/// One selectable option of a choice parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

/// Parameter type with its bounds or options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterKind {
    Number { min: i64, max: i64, default: i64 },
    Choice { options: Vec<ChoiceOption>, default: String },
}

/// Declared parameter of an algorithm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: ParameterKind,
}

/// Resolved parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Number(i64),
    Choice(String),
}

impl ParameterSpec {
    pub fn number(id: &str, name: &str, min: i64, max: i64, default: i64) -> Self {
        debug_assert!(min <= default && default <= max);
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            kind: ParameterKind::Number { min, max, default },
        }
    }

    pub fn choice(id: &str, name: &str, options: &[(&str, &str)], default: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            kind: ParameterKind::Choice {
                options: options
                    .iter()
                    .map(|(value, label)| ChoiceOption {
                        value: (*value).to_owned(),
                        label: (*label).to_owned(),
                    })
                    .collect(),
                default: default.to_owned(),
            },
        }
    }

    /// The visualization speed shared by every algorithm
    pub fn speed() -> Self {
        Self::choice(
            SPEED,
            "Visualization Speed",
            &[("1000", "Slow"), ("500", "Medium"), ("100", "Fast"), ("0", "Fastest")],
            "500",
        )
    }

    pub fn default_value(&self) -> ParameterValue {
        match &self.kind {
            ParameterKind::Number { default, .. } => ParameterValue::Number(*default),
            ParameterKind::Choice { default, .. } => ParameterValue::Choice(default.clone()),
        }
    }

    /// Turns a raw value into a usable one, substituting the default when needed
    pub fn resolve(&self, raw: Option<&str>) -> ParameterValue {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return self.default_value();
        };

        match &self.kind {
            ParameterKind::Number { min, max, default } => match parse_number(raw) {
                Some(value) => {
                    let clamped = value.clamp(*min, *max);
                    if clamped != value {
                        debug!("Parameter {} = {} clamped to {}", self.id, value, clamped);
                    }
                    ParameterValue::Number(clamped)
                }
                None => {
                    warn!("Parameter {}: {:?} is not a number, using {}", self.id, raw, default);
                    ParameterValue::Number(*default)
                }
            },
            ParameterKind::Choice { options, default } => {
                if options.iter().any(|option| option.value == raw) {
                    ParameterValue::Choice(raw.to_owned())
                } else {
                    warn!("Parameter {}: {:?} is not an option, using {:?}", self.id, raw, default);
                    ParameterValue::Choice(default.clone())
                }
            }
        }
    }
}

fn parse_number(raw: &str) -> Option<i64> {
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.trunc() as i64)
}

/// Parameter values ready for an algorithm, one per declared parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedParameters {
    values: BTreeMap<String, ParameterValue>,
}

impl ResolvedParameters {
    pub fn resolve(specs: &[ParameterSpec], raw: &RawParameters) -> Self {
        let values = specs
            .iter()
            .map(|spec| (spec.id.clone(), spec.resolve(raw.get(&spec.id).map(String::as_str))))
            .collect();
        Self { values }
    }

    /// Declared defaults only
    pub fn defaults(specs: &[ParameterSpec]) -> Self {
        Self::resolve(specs, &RawParameters::new())
    }

    pub fn get(&self, id: &str) -> Option<&ParameterValue> {
        self.values.get(id)
    }

    pub fn number_or(&self, id: &str, fallback: i64) -> i64 {
        match self.values.get(id) {
            Some(ParameterValue::Number(value)) => *value,
            Some(ParameterValue::Choice(value)) => parse_number(value).unwrap_or(fallback),
            None => fallback,
        }
    }

    /// Non-negative count, for sizes
    pub fn count_or(&self, id: &str, fallback: usize) -> usize {
        usize::try_from(self.number_or(id, fallback as i64)).unwrap_or(fallback)
    }

    pub fn choice_or<'a>(&'a self, id: &str, fallback: &'a str) -> &'a str {
        match self.values.get(id) {
            Some(ParameterValue::Choice(value)) => value,
            _ => fallback,
        }
    }

    /// Step pacing selected through the speed parameter
    pub fn pace(&self) -> Pace {
        let millis = self.number_or(SPEED, DEFAULT_SPEED_MS as i64);
        Pace::from_millis(u64::try_from(millis).unwrap_or(DEFAULT_SPEED_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::state::Delay;

    fn specs() -> Vec<ParameterSpec> {
        vec![ParameterSpec::number("arraySize", "Array Size", 5, 50, 20), ParameterSpec::speed()]
    }

    fn raw(pairs: &[(&str, &str)]) -> RawParameters {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let params = ResolvedParameters::resolve(&specs(), &RawParameters::new());
        assert_eq!(params.number_or("arraySize", 0), 20);
        assert_eq!(params.choice_or(SPEED, ""), "500");
        assert_eq!(params.pace().delay(crate::algorithm::state::Beat::Full), Delay::Fixed { millis: 500 });
    }

    #[test]
    fn test_invalid_number_falls_back_to_default() {
        let params = ResolvedParameters::resolve(&specs(), &raw(&[("arraySize", "lots")]));
        assert_eq!(params.number_or("arraySize", 0), 20);
    }

    #[test]
    fn test_numbers_are_parsed_and_clamped() {
        let params = ResolvedParameters::resolve(&specs(), &raw(&[("arraySize", " 12 ")]));
        assert_eq!(params.count_or("arraySize", 0), 12);

        let params = ResolvedParameters::resolve(&specs(), &raw(&[("arraySize", "500")]));
        assert_eq!(params.count_or("arraySize", 0), 50);

        let params = ResolvedParameters::resolve(&specs(), &raw(&[("arraySize", "7.9")]));
        assert_eq!(params.count_or("arraySize", 0), 7);
    }

    #[test]
    fn test_unknown_choice_reverts_to_default() {
        let params = ResolvedParameters::resolve(&specs(), &raw(&[(SPEED, "42")]));
        assert_eq!(params.choice_or(SPEED, ""), "500");
    }

    #[test]
    fn test_fastest_speed_uses_frame_cadence() {
        let params = ResolvedParameters::resolve(&specs(), &raw(&[(SPEED, "0")]));
        assert_eq!(params.pace().delay(crate::algorithm::state::Beat::Half), Delay::Frame);
    }

    #[test]
    fn test_spec_serializes_for_form_generators() {
        let json = serde_json::to_value(ParameterSpec::number("gridSize", "Grid Size", 5, 20, 10)).unwrap();
        assert_eq!(json["type"], "number");
        assert_eq!(json["min"], 5);
        assert_eq!(json["default"], 10);
    }
}
