//! Defines the cell value held by a [`crate::Record`] and the three semantic
//! kinds a value (and a column) can take.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// The semantic kind of a single [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A finite floating point number.
    Number,
    /// A point in time, always held in UTC.
    Temporal,
    /// Anything else, kept verbatim.
    Text,
}

/// A single cell of a weather-station dataset.
///
/// Values start out loosely typed (the parser only recognises numbers) and are
/// rewritten by [`crate::coerce`] once the column they live in has been classified.
///
/// # Examples
///
/// ```
/// use weather_dashboard::{Value, ValueKind};
///
/// let v = Value::Number(21.5);
/// assert_eq!(v.kind(), ValueKind::Number);
/// assert_eq!(v.as_number(), Some(21.5));
/// assert_eq!(Value::text("n/a").to_string(), "n/a");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Temporal(DateTime<Utc>),
    Text(String),
}

impl Value {
    /// Convenience constructor for [`Value::Text`].
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Types a raw CSV token: numbers become [`Value::Number`], everything
    /// else stays [`Value::Text`] verbatim.
    pub fn from_token(token: &str) -> Self {
        match parse_number(token) {
            Some(n) => Value::Number(n),
            None => Value::Text(token.to_string()),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Temporal(_) => ValueKind::Temporal,
            Value::Text(_) => ValueKind::Text,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_temporal(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Temporal(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Parses a token as a finite decimal number after trimming surrounding
/// whitespace. `inf`, `NaN`, hex and digit separators are rejected.
pub fn parse_number(token: &str) -> Option<f64> {
    let t = token.trim();
    if !t.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if !t
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return None;
    }
    t.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Renders a timestamp the way the cache and the offline artifacts store it:
/// `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn to_iso_string(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Formats numbers without a trailing `.0` for whole values, temporal values as
/// ISO-8601 and text verbatim.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Temporal(dt) => write!(f, "{}", to_iso_string(dt)),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::Temporal(dt)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}
