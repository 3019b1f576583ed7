// SPDX-License-Identifier: MIT OR Apache-2.0
//! Values carried by data pins.
//!
//! Data pins are loosely typed at runtime: a `Number` input may receive a
//! string default edited by the host, so consumers go through the coercion
//! helpers instead of matching on the variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value that can be stored in or resolved from a pin
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum PinValue {
    /// Absent value
    #[default]
    Null,
    /// Number
    Number(f64),
    /// String
    String(String),
    /// Boolean
    Bool(bool),
}

impl PinValue {
    /// The neutral value returned for unconnected or unknown inputs
    pub const fn neutral() -> Self {
        Self::Number(0.0)
    }

    /// Numeric view of the value. Anything that does not parse becomes `0`.
    pub fn as_number(&self) -> f64 {
        let n = match self {
            Self::Null => 0.0,
            Self::Number(n) => *n,
            Self::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Self::Bool(b) => f64::from(u8::from(*b)),
        };
        if n.is_nan() { 0.0 } else { n }
    }

    /// Integer view of the value, truncating toward zero
    pub fn as_integer(&self) -> i64 {
        let n = self.as_number();
        if n.is_finite() { n.trunc() as i64 } else { 0 }
    }

    /// Leading integer of a number or numeric string, like a loop bound typed
    /// into a text field. `None` when there is no integer to read.
    pub fn parse_integer(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            Self::String(s) => {
                let s = s.trim_start();
                let unsigned = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
                let digits = unsigned
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(unsigned.len());
                if digits == 0 {
                    return None;
                }
                s[..s.len() - unsigned.len() + digits].parse().ok()
            }
            Self::Null | Self::Number(_) | Self::Bool(_) => None,
        }
    }

    /// Boolean view of the value
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Bool(b) => *b,
        }
    }
}

impl fmt::Display for PinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<f64> for PinValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for PinValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for PinValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for PinValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PinValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_coercion() {
        assert_eq!(PinValue::from("2.5").as_number(), 2.5);
        assert_eq!(PinValue::from(" 7 ").as_number(), 7.0);
        assert_eq!(PinValue::from("abc").as_number(), 0.0);
        assert_eq!(PinValue::Null.as_number(), 0.0);
        assert_eq!(PinValue::Bool(true).as_number(), 1.0);
        assert_eq!(PinValue::Number(f64::NAN).as_number(), 0.0);
    }

    #[test]
    fn test_integer_truncates() {
        assert_eq!(PinValue::from("2.9").as_integer(), 2);
        assert_eq!(PinValue::Number(-1.5).as_integer(), -1);
        assert_eq!(PinValue::Number(f64::INFINITY).as_integer(), 0);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(PinValue::Number(2.9).parse_integer(), Some(2));
        assert_eq!(PinValue::from(" -12px").parse_integer(), Some(-12));
        assert_eq!(PinValue::from("+3").parse_integer(), Some(3));
        assert_eq!(PinValue::from("abc").parse_integer(), None);
        assert_eq!(PinValue::from("").parse_integer(), None);
        assert_eq!(PinValue::from("-").parse_integer(), None);
        assert_eq!(PinValue::Number(f64::NAN).parse_integer(), None);
        assert_eq!(PinValue::Null.parse_integer(), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!PinValue::Null.is_truthy());
        assert!(!PinValue::neutral().is_truthy());
        assert!(!PinValue::from("").is_truthy());
        assert!(PinValue::from("false").is_truthy());
        assert!(PinValue::Number(-3.0).is_truthy());
        assert!(PinValue::Bool(true).is_truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(PinValue::Number(2.0).to_string(), "2");
        assert_eq!(PinValue::Number(2.5).to_string(), "2.5");
        assert_eq!(PinValue::from("Hello").to_string(), "Hello");
        assert_eq!(PinValue::Null.to_string(), "null");
        assert_eq!(PinValue::Bool(false).to_string(), "false");
    }
}
