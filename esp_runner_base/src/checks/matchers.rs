//! Expectation matchers
//!
//! Comparisons are loose between numbers, booleans and their string forms,
//! since most resource properties come from command output.

use regex::Regex;
use serde_json::Value;
use std::fmt;

/// Errors building a matcher from a name and expected value
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatcherError {
    #[error("Unknown matcher '{name}'")]
    UnknownMatcher { name: String },

    #[error("Matcher '{name}' requires an expected value")]
    MissingValue { name: String },

    #[error("Matcher '{name}' requires a numeric value, got {value}")]
    NotNumeric { name: String, value: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Comparison applied to a property value
#[derive(Debug, Clone)]
pub enum Matcher {
    Eq(Value),
    Ne(Value),
    Match(Regex),
    Contain(Value),
    BeTruthy,
    BeFalsy,
    Gt(f64),
    Lt(f64),
    Exist,
}

impl Matcher {
    /// Names accepted by [`Matcher::from_parts`]
    pub const NAMES: &'static [&'static str] = &[
        "eq", "ne", "match", "contain", "be_truthy", "be_falsy", "gt", "lt", "exist",
    ];

    /// Build a matcher from its name and optional expected value
    pub fn from_parts(name: &str, expected: Option<Value>) -> Result<Self, MatcherError> {
        let require = |expected: Option<Value>| {
            expected.ok_or_else(|| MatcherError::MissingValue {
                name: name.to_string(),
            })
        };
        let numeric = |expected: Option<Value>| -> Result<f64, MatcherError> {
            let value = require(expected)?;
            as_number(&value).ok_or_else(|| MatcherError::NotNumeric {
                name: name.to_string(),
                value: value.to_string(),
            })
        };

        match name {
            "eq" => Ok(Matcher::Eq(require(expected)?)),
            "ne" => Ok(Matcher::Ne(require(expected)?)),
            "match" => {
                let value = require(expected)?;
                let pattern = as_text(&value);
                Regex::new(&pattern)
                    .map(Matcher::Match)
                    .map_err(|e| MatcherError::InvalidPattern {
                        pattern,
                        reason: e.to_string(),
                    })
            }
            "contain" => Ok(Matcher::Contain(require(expected)?)),
            "be_truthy" => Ok(Matcher::BeTruthy),
            "be_falsy" => Ok(Matcher::BeFalsy),
            "gt" => Ok(Matcher::Gt(numeric(expected)?)),
            "lt" => Ok(Matcher::Lt(numeric(expected)?)),
            "exist" => Ok(Matcher::Exist),
            other => Err(MatcherError::UnknownMatcher {
                name: other.to_string(),
            }),
        }
    }

    /// Check an actual value; the error is the failure message
    pub fn evaluate(&self, actual: &Value) -> Result<(), String> {
        let holds = match self {
            Matcher::Eq(expected) => loosely_equal(actual, expected),
            Matcher::Ne(expected) => !loosely_equal(actual, expected),
            Matcher::Match(pattern) => pattern.is_match(&as_text(actual)),
            Matcher::Contain(expected) => contains(actual, expected),
            Matcher::BeTruthy => is_truthy(actual),
            Matcher::BeFalsy => !is_truthy(actual),
            Matcher::Gt(bound) => match as_number(actual) {
                Some(n) => n > *bound,
                None => return Err(format!("expected a number to be > {}, got {}", bound, actual)),
            },
            Matcher::Lt(bound) => match as_number(actual) {
                Some(n) => n < *bound,
                None => return Err(format!("expected a number to be < {}, got {}", bound, actual)),
            },
            Matcher::Exist => !actual.is_null() && actual != &Value::Bool(false),
        };

        if holds {
            Ok(())
        } else {
            Err(format!("expected {} to {}", actual, self))
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Eq(v) => write!(f, "eq {}", v),
            Matcher::Ne(v) => write!(f, "not eq {}", v),
            Matcher::Match(p) => write!(f, "match /{}/", p.as_str()),
            Matcher::Contain(v) => write!(f, "contain {}", v),
            Matcher::BeTruthy => write!(f, "be truthy"),
            Matcher::BeFalsy => write!(f, "be falsy"),
            Matcher::Gt(n) => write!(f, "be > {}", n),
            Matcher::Lt(n) => write!(f, "be < {}", n),
            Matcher::Exist => write!(f, "exist"),
        }
    }
}

/// Only null and false are falsy
fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn loosely_equal(actual: &Value, expected: &Value) -> bool {
    if actual == expected {
        return true;
    }
    match (actual, expected) {
        (Value::Number(_), Value::Number(_)) => as_number(actual) == as_number(expected),
        (Value::String(s), Value::Number(_)) | (Value::Number(_), Value::String(s)) => {
            let other = if actual.is_string() { expected } else { actual };
            s.trim().parse::<f64>().ok() == as_number(other)
        }
        (Value::String(s), Value::Bool(b)) | (Value::Bool(b), Value::String(s)) => {
            s.trim() == b.to_string()
        }
        _ => false,
    }
}

fn contains(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::String(s) => s.contains(&as_text(expected)),
        Value::Array(items) => items.iter().any(|item| loosely_equal(item, expected)),
        Value::Object(map) => map.contains_key(&as_text(expected)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn matcher(name: &str, expected: Value) -> Matcher {
        Matcher::from_parts(name, Some(expected)).unwrap()
    }

    #[test]
    fn test_eq_is_loose_across_numbers_and_strings() {
        assert!(matcher("eq", json!(0)).evaluate(&json!("0")).is_ok());
        assert!(matcher("eq", json!("0644")).evaluate(&json!("0644")).is_ok());
        assert!(matcher("eq", json!(true)).evaluate(&json!("true")).is_ok());
        assert!(matcher("eq", json!(1)).evaluate(&json!(1.0)).is_ok());
        assert!(matcher("eq", json!("root")).evaluate(&json!("admin")).is_err());
    }

    #[test]
    fn test_failure_message_names_both_sides() {
        let err = matcher("eq", json!("root")).evaluate(&json!("admin")).unwrap_err();
        assert_eq!(err, "expected \"admin\" to eq \"root\"");
    }

    #[test]
    fn test_match_and_contain() {
        assert!(matcher("match", json!("^Linux")).evaluate(&json!("Linux 6.1")).is_ok());
        assert!(matcher("contain", json!("ssh")).evaluate(&json!("openssh-server")).is_ok());
        assert!(matcher("contain", json!(22)).evaluate(&json!([22, 80])).is_ok());
        assert!(matcher("contain", json!("x")).evaluate(&json!(12)).is_err());
    }

    #[test]
    fn test_truthiness() {
        let truthy = Matcher::from_parts("be_truthy", None).unwrap();
        assert!(truthy.evaluate(&json!(0)).is_ok());
        assert!(truthy.evaluate(&json!("")).is_ok());
        assert!(truthy.evaluate(&Value::Null).is_err());
        let falsy = Matcher::from_parts("be_falsy", None).unwrap();
        assert!(falsy.evaluate(&json!(false)).is_ok());
    }

    #[test]
    fn test_numeric_bounds() {
        assert!(matcher("gt", json!(100)).evaluate(&json!("4096")).is_ok());
        assert!(matcher("lt", json!(100)).evaluate(&json!(4096)).is_err());
        assert!(matcher("lt", json!(1)).evaluate(&json!("abc")).is_err());
    }

    #[test]
    fn test_construction_errors() {
        assert_matches!(
            Matcher::from_parts("be_within", None),
            Err(MatcherError::UnknownMatcher { .. })
        );
        assert_matches!(
            Matcher::from_parts("eq", None),
            Err(MatcherError::MissingValue { .. })
        );
        assert_matches!(
            Matcher::from_parts("gt", Some(json!("many"))),
            Err(MatcherError::NotNumeric { .. })
        );
        assert_matches!(
            Matcher::from_parts("match", Some(json!("("))),
            Err(MatcherError::InvalidPattern { .. })
        );
    }
}
