// src/args/value.rs

use std::fmt;

/// A single option value.
///
/// `Absent`, `Bool(false)` and empty text never produce tokens. They are still
/// remembered by the set so a later edit can bring them back.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OptionValue {
    #[default]
    Absent,
    Bool(bool),
    Number(f64),
    Text(String),
}

/// What a value contributes to emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Emission {
    /// Nothing is emitted for this entry.
    Skip,
    /// Only the name is emitted (`-an`, `hflip`).
    Bare,
    /// Name and stringified value are emitted.
    Value(String),
}

impl OptionValue {
    pub(crate) fn emission(&self) -> Emission {
        match self {
            OptionValue::Absent | OptionValue::Bool(false) => Emission::Skip,
            OptionValue::Bool(true) => Emission::Bare,
            OptionValue::Number(n) => Emission::Value(n.to_string()),
            OptionValue::Text(s) if s.is_empty() => Emission::Skip,
            OptionValue::Text(s) => Emission::Value(s.clone()),
        }
    }

    /// True when this value would produce at least one token.
    pub fn is_emitted(&self) -> bool {
        self.emission() != Emission::Skip
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Absent => Ok(()),
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Number(n) => write!(f, "{n}"),
            OptionValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Number(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Number(value as f64)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Number(f64::from(value))
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        OptionValue::Number(f64::from(value))
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

impl<T: Into<OptionValue>> From<Option<T>> for OptionValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(OptionValue::Absent, Into::into)
    }
}
