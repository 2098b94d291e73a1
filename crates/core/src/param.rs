//! Closed value type for materialised configuration parameters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters keyed by stable string names.
pub type ParameterMap = BTreeMap<String, ParamValue>;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Free text
    Text(String),
    /// Numeric value
    Number(f64),
    /// Boolean switch
    Flag(bool),
}

impl ParamValue {
    /// Numeric view, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text view, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean view, if this is a flag.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
            Self::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_map_serializes_as_plain_json_object() {
        let mut params = ParameterMap::new();
        params.insert("learning_rate".to_string(), 0.01.into());
        params.insert("enabled".to_string(), true.into());
        params.insert("mode".to_string(), "adaptive".into());

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"enabled": true, "learning_rate": 0.01, "mode": "adaptive"})
        );

        let back: ParameterMap = serde_json::from_value(json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_typed_accessors() {
        assert_eq!(ParamValue::from(2.5).as_f64(), Some(2.5));
        assert_eq!(ParamValue::from("x").as_f64(), None);
        assert_eq!(ParamValue::from(false).as_bool(), Some(false));
        assert_eq!(ParamValue::from(150u32).to_string(), "150");
    }
}
