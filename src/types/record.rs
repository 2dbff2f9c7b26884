//! An ordered, named-field row of a weather-station dataset, with the JSON
//! (de)serialization used by the cache and the offline artifacts.

use crate::types::value::{to_iso_string, Value};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One row of a dataset: column name → [`Value`], in source column order.
///
/// Column counts are small (a station reports a couple of dozen fields at most),
/// so lookups are a linear scan over the ordered entries.
///
/// # Examples
///
/// ```
/// use weather_dashboard::{Record, Value};
///
/// let mut record = Record::new();
/// record.insert("station", Value::text("ML-417"));
/// record.insert("solar", Value::Number(12.3));
/// record.insert("station", Value::text("ML-418")); // replaced in place
///
/// assert_eq!(record.len(), 2);
/// assert_eq!(record.column_names().collect::<Vec<_>>(), ["station", "solar"]);
/// assert_eq!(record.get("station"), Some(&Value::text("ML-418")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Inserts `value` under `column`. An existing column keeps its position and
    /// has its value replaced; the previous value is returned.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) -> Option<Value> {
        let column = column.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((column, value));
                None
            }
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
        self.entries
            .iter_mut()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

// Temporal values are written as ISO-8601 strings; the storage format is
// text-only and loses the distinction between temporal and text cells.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            match value {
                Value::Number(n) => map.serialize_entry(name, n)?,
                Value::Temporal(dt) => map.serialize_entry(name, &to_iso_string(dt))?,
                Value::Text(s) => map.serialize_entry(name, s)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object mapping column names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
        let mut record = Record::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, raw)) = access.next_entry::<String, serde_json::Value>()? {
            record.insert(name, json_to_value(raw));
        }
        Ok(record)
    }
}

/// Maps a stored JSON scalar back onto a loosely typed [`Value`]. Temporal
/// information is restored later by the cache, which knows the column names.
fn json_to_value(raw: serde_json::Value) -> Value {
    match raw {
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) => Value::Number(f),
            None => Value::Text(n.to_string()),
        },
        serde_json::Value::String(s) => Value::Text(s),
        serde_json::Value::Null => Value::Text(String::new()),
        serde_json::Value::Bool(b) => Value::Text(b.to_string()),
        other => Value::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_serialize_keeps_column_order() -> Result<(), serde_json::Error> {
        let record: Record = vec![
            ("zeta", Value::Number(1.0)),
            ("alpha", Value::text("a")),
            (
                "timestamp",
                Value::Temporal(Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap()),
            ),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&record)?;
        assert_eq!(
            json,
            r#"{"zeta":1.0,"alpha":"a","timestamp":"2024-01-01T01:00:00.000Z"}"#
        );
        Ok(())
    }

    #[test]
    fn test_deserialize_keeps_column_order_and_loses_temporal() -> Result<(), serde_json::Error> {
        let record: Record =
            serde_json::from_str(r#"{"b":"2024-01-01T00:00:00.000Z","a":3,"c":null,"d":true}"#)?;

        assert_eq!(record.column_names().collect::<Vec<_>>(), ["b", "a", "c", "d"]);
        assert_eq!(record.get("b"), Some(&Value::text("2024-01-01T00:00:00.000Z")));
        assert_eq!(record.get("a"), Some(&Value::Number(3.0)));
        assert_eq!(record.get("c"), Some(&Value::text("")));
        assert_eq!(record.get("d"), Some(&Value::text("true")));
        Ok(())
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record = Record::new();
        assert_eq!(record.insert("a", Value::Number(1.0)), None);
        record.insert("b", Value::Number(2.0));
        assert_eq!(
            record.insert("a", Value::Number(3.0)),
            Some(Value::Number(1.0))
        );
        assert_eq!(record.column_names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(record.get("a"), Some(&Value::Number(3.0)));
    }
}
