//! Parameter definitions and constraints for transform parameters.
//!
//! Every transform declares its parameters as a small table: name, expected
//! type, constraints and the default used when the document omits the
//! parameter or supplies something that fails the checks. One generic routine
//! in [`crate::filters::params`] interprets these tables.

use crate::core::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expected shape of a parameter value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Integer or float literal
    Number,
    /// Integer literal only
    Integer,
    /// Two-element integer array `[a, b]`
    IntegerPair,
    /// Integer `k`, or two-element integer array `[kx, ky]`
    Kernel,
}

impl ParamType {
    /// Check whether a value has this shape.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParamType::Number => value.is_number(),
            ParamType::Integer => value.as_integer().is_some(),
            ParamType::IntegerPair => value.as_integer_pair().is_some(),
            ParamType::Kernel => value.as_integer().is_some() || value.as_integer_pair().is_some(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Number => write!(f, "number"),
            ParamType::Integer => write!(f, "integer"),
            ParamType::IntegerPair => write!(f, "[integer, integer]"),
            ParamType::Kernel => write!(f, "odd integer | [odd integer, odd integer]"),
        }
    }
}

/// Constraints a parameter value must satisfy to be adopted.
///
/// Numeric constraints apply to every number in the value, so they cover
/// scalar parameters and each component of a pair alike.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "params")]
pub enum Constraint {
    /// Numeric value must be <= max
    MaxValue(f64),
    /// Numeric value must be > bound
    Above(f64),
    /// Numeric value must be < bound
    Below(f64),
    /// Integer must be non-negative (>= 0)
    NonNegative,
    /// Integer must be positive (> 0)
    Positive,
    /// Integer must be odd
    Odd,
    /// Pair must satisfy first < second
    Ascending,
}

impl Constraint {
    /// Validate a value against this constraint.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self {
            Constraint::MaxValue(max) => each_number(value, &|n| {
                if n > *max {
                    Err(format!("Value {} is above maximum {}", n, max))
                } else {
                    Ok(())
                }
            }),
            Constraint::Above(bound) => each_number(value, &|n| {
                if n <= *bound {
                    Err(format!("Value {} must be greater than {}", n, bound))
                } else {
                    Ok(())
                }
            }),
            Constraint::Below(bound) => each_number(value, &|n| {
                if n >= *bound {
                    Err(format!("Value {} must be less than {}", n, bound))
                } else {
                    Ok(())
                }
            }),
            Constraint::NonNegative => each_number(value, &|n| {
                if n < 0.0 {
                    Err(format!("Value {} must be non-negative", n))
                } else {
                    Ok(())
                }
            }),
            Constraint::Positive => each_number(value, &|n| {
                if n <= 0.0 {
                    Err(format!("Value {} must be positive", n))
                } else {
                    Ok(())
                }
            }),
            Constraint::Odd => each_number(value, &|n| {
                if n.rem_euclid(2.0) != 1.0 {
                    Err(format!("Value {} must be odd", n))
                } else {
                    Ok(())
                }
            }),
            Constraint::Ascending => match value.as_integer_pair() {
                Some((low, high)) if low >= high => Err(format!(
                    "Range [{}, {}] must have its first value below its second",
                    low, high
                )),
                _ => Ok(()),
            },
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::MaxValue(v) => write!(f, "<= {}", v),
            Constraint::Above(v) => write!(f, "> {}", v),
            Constraint::Below(v) => write!(f, "< {}", v),
            Constraint::NonNegative => write!(f, ">= 0"),
            Constraint::Positive => write!(f, "> 0"),
            Constraint::Odd => write!(f, "odd"),
            Constraint::Ascending => write!(f, "first < second"),
        }
    }
}

fn each_number(value: &Value, check: &dyn Fn(f64) -> Result<(), String>) -> Result<(), String> {
    match value {
        Value::Array(items) => items.iter().try_for_each(|item| each_number(item, check)),
        other => match other.as_float() {
            Some(n) => check(n),
            None => Ok(()),
        },
    }
}

/// Definition of one transform parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Name as it appears in the parameter set
    pub name: String,
    /// Expected type
    pub param_type: ParamType,
    /// Value used when absent or invalid; `None` means "not set"
    pub default_value: Option<Value>,
    /// Description for `augmenta info`
    pub description: String,
    /// Constraints for validation
    pub constraints: Vec<Constraint>,
}

impl ParameterDefinition {
    /// Create a new parameter definition with a default.
    pub fn new(name: impl Into<String>, param_type: ParamType, default_value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            param_type,
            default_value: Some(default_value.into()),
            description: String::new(),
            constraints: Vec::new(),
        }
    }

    /// Create a parameter definition that stays unset when absent or invalid.
    pub fn without_default(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            default_value: None,
            description: String::new(),
            constraints: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Validate a value against this parameter's type and constraints.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        if !self.param_type.matches(value) {
            return Err(format!(
                "Type mismatch for parameter '{}': expected {}, got {}",
                self.name,
                self.param_type,
                value.type_name()
            ));
        }

        for constraint in &self.constraints {
            constraint.validate(value)?;
        }

        Ok(())
    }

    /// Human-readable summary of the constraints, e.g. `<= 1, > 0`.
    pub fn constraint_summary(&self) -> String {
        if self.constraints.is_empty() {
            return "any".to_string();
        }
        self.constraints
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_matching() {
        assert!(ParamType::Number.matches(&Value::Integer(1)));
        assert!(ParamType::Number.matches(&Value::Float(1.5)));
        assert!(!ParamType::Number.matches(&Value::from("1")));
        assert!(ParamType::Integer.matches(&Value::Integer(-1)));
        assert!(!ParamType::Integer.matches(&Value::Float(1.0)));
        assert!(ParamType::IntegerPair.matches(&Value::from(vec![1i64, 2])));
        assert!(!ParamType::IntegerPair.matches(&Value::from(vec![1i64, 2, 3])));
        assert!(ParamType::Kernel.matches(&Value::Integer(5)));
        assert!(ParamType::Kernel.matches(&Value::from(vec![3i64, 5])));
    }

    #[test]
    fn test_numeric_constraints() {
        assert!(Constraint::MaxValue(1.0).validate(&Value::Float(1.0)).is_ok());
        assert!(Constraint::MaxValue(1.0).validate(&Value::Float(1.2)).is_err());
        assert!(Constraint::Above(0.0).validate(&Value::Float(0.0)).is_err());
        assert!(Constraint::Below(3.0).validate(&Value::Integer(2)).is_ok());
        assert!(Constraint::Below(3.0).validate(&Value::Integer(3)).is_err());
    }

    #[test]
    fn test_odd_applies_to_pairs() {
        assert!(Constraint::Odd.validate(&Value::Integer(3)).is_ok());
        assert!(Constraint::Odd.validate(&Value::Integer(4)).is_err());
        assert!(Constraint::Odd.validate(&Value::Integer(-3)).is_ok());
        assert!(Constraint::Odd.validate(&Value::from(vec![3i64, 4])).is_err());
    }

    #[test]
    fn test_ascending() {
        assert!(Constraint::Ascending.validate(&Value::from(vec![-10i64, 10])).is_ok());
        assert!(Constraint::Ascending.validate(&Value::from(vec![5i64, 5])).is_err());
        assert!(Constraint::Ascending.validate(&Value::from(vec![6i64, 5])).is_err());
    }

    #[test]
    fn test_definition_validate_reports_type() {
        let def = ParameterDefinition::new("flip_code", ParamType::Integer, 0i64);
        let err = def.validate(&Value::Float(1.0)).unwrap_err();
        assert!(err.contains("flip_code"));
        assert!(err.contains("float"));
    }
}
