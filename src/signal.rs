// Copyright 2026 Cornell University
// released under MIT License

//! # Signal values
//! Values of single-bit control signals and of the 8-bit data bus,
//! as they appear as whitespace-separated tokens in trace files.

use std::fmt;

/// Level of a single-bit control signal sampled from a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logic {
    Low,
    High,
    /// Anything other than `0` or `1` (e.g. `x` or `z` from a 4-state simulator)
    Unknown,
}

impl Logic {
    pub fn parse(token: &str) -> Self {
        match token {
            "0" => Logic::Low,
            "1" => Logic::High,
            _ => Logic::Unknown,
        }
    }

    pub fn is_high(self) -> bool {
        self == Logic::High
    }

    pub fn is_low(self) -> bool {
        self == Logic::Low
    }
}

impl From<bool> for Logic {
    fn from(value: bool) -> Self {
        if value {
            Logic::High
        } else {
            Logic::Low
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::Low => write!(f, "0"),
            Logic::High => write!(f, "1"),
            Logic::Unknown => write!(f, "X"),
        }
    }
}

/// A value observed on (or driven onto) the data bus.
///
/// Bytes are compared numerically, so `aa` and `AA` are equal.
/// Tokens that are not a hex byte (`XX`, `ZZ`, `1X`) are kept in uppercase,
/// so an undefined value on the bus still counts as an observed output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BusValue {
    Known(u8),
    Unknown(String),
}

impl BusValue {
    pub fn parse(token: &str) -> Self {
        match u8::from_str_radix(token, 16) {
            // `from_str_radix` accepts a leading `+`, which is not a hex digit
            Ok(byte) if !token.starts_with('+') => BusValue::Known(byte),
            _ => BusValue::Unknown(token.to_uppercase()),
        }
    }
}

impl From<u8> for BusValue {
    fn from(byte: u8) -> Self {
        BusValue::Known(byte)
    }
}

impl fmt::Display for BusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusValue::Known(byte) => write!(f, "{:02X}", byte),
            BusValue::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logic_levels() {
        assert_eq!(Logic::parse("1"), Logic::High);
        assert_eq!(Logic::parse("0"), Logic::Low);
        assert_eq!(Logic::parse("x"), Logic::Unknown);
        assert_eq!(Logic::parse("01"), Logic::Unknown);
        assert!(!Logic::Unknown.is_low());
        assert!(!Logic::Unknown.is_high());
    }

    #[test]
    fn test_bus_value_case_insensitive() {
        assert_eq!(BusValue::parse("aa"), BusValue::parse("AA"));
        assert_eq!(BusValue::parse("0a"), BusValue::Known(0x0A));
        assert_eq!(BusValue::parse("A"), BusValue::Known(0x0A));
        assert_eq!(BusValue::parse("0a").to_string(), "0A");
    }

    #[test]
    fn test_bus_value_unknown_tokens() {
        assert_eq!(BusValue::parse("xx"), BusValue::Unknown("XX".to_string()));
        assert_eq!(BusValue::parse("xx").to_string(), "XX");
        assert_eq!(BusValue::parse("+1"), BusValue::Unknown("+1".to_string()));
        // wider than a byte
        assert_eq!(BusValue::parse("1FF"), BusValue::Unknown("1FF".to_string()));
        assert_ne!(BusValue::parse("XX"), BusValue::Known(0));
    }
}
