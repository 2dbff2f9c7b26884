//! The field-name vocabulary driving column classification.
//!
//! Station CSVs are inconsistently typed, so the classifier leans on what the
//! column is *called* as much as on what it contains. The lists here are data,
//! not logic: they can be extended, or loaded from JSON, without touching
//! [`crate::classify`].

use serde::{Deserialize, Serialize};

/// Name fragments marking a column as temporal.
const TEMPORAL_FRAGMENTS: &[&str] = &["time", "date", "timestamp"];

/// Measurement fields reported by the station (note the source spells
/// "orientation" as "orintation").
const MEASUREMENT_FIELDS: &[&str] = &[
    "solar",
    "precipitation",
    "strikes",
    "strikeDistance",
    "windSpeed",
    "windDirection",
    "gustWindSpeed",
    "airTemperature",
    "Vapor pressure",
    "atmosphericPressure",
    "R.Humidity",
    "sensorTemp",
    "X orintation",
    "Y orintation",
    "compassHeading",
];

/// Name fragments that keep a column out of the last-resort numeric fallback.
const NON_MEASUREMENT_FRAGMENTS: &[&str] = &["time", "date", "name", "id"];

/// Field-name knowledge used by [`crate::classify`].
///
/// `Default` yields the weather-station vocabulary. All matching is
/// case-insensitive.
///
/// # Examples
///
/// ```
/// use weather_dashboard::FieldVocabulary;
///
/// let vocabulary = FieldVocabulary::default();
/// assert!(vocabulary.is_temporal_name("Timestamp"));
/// assert!(vocabulary.is_measurement_name("air_temperature"));
/// assert!(vocabulary.is_measurement_name("vapor_pressure"));
/// assert!(!vocabulary.is_measurement_name("station"));
///
/// let extended = FieldVocabulary::default().with_measurement_field("uvIndex");
/// assert!(extended.is_measurement_name("uvindex"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldVocabulary {
    /// A column whose name contains one of these is temporal.
    pub temporal_fragments: Vec<String>,
    /// A column whose name contains one of these, or equals one after
    /// stripping spaces and underscores, is numeric.
    pub measurement_fields: Vec<String>,
    /// Excluded from the last-resort numeric fallback.
    pub non_measurement_fragments: Vec<String>,
}

impl Default for FieldVocabulary {
    fn default() -> Self {
        Self {
            temporal_fragments: to_owned_list(TEMPORAL_FRAGMENTS),
            measurement_fields: to_owned_list(MEASUREMENT_FIELDS),
            non_measurement_fragments: to_owned_list(NON_MEASUREMENT_FRAGMENTS),
        }
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Lowercases and drops spaces and underscores.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != ' ' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn contains_any(name: &str, fragments: &[String]) -> bool {
    let lower = name.to_lowercase();
    fragments
        .iter()
        .any(|fragment| lower.contains(&fragment.to_lowercase()))
}

impl FieldVocabulary {
    pub fn with_measurement_field(mut self, field: impl Into<String>) -> Self {
        self.measurement_fields.push(field.into());
        self
    }

    pub fn with_temporal_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.temporal_fragments.push(fragment.into());
        self
    }

    pub fn is_temporal_name(&self, name: &str) -> bool {
        contains_any(name, &self.temporal_fragments)
    }

    pub fn is_measurement_name(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        let normalized = normalize(name);
        self.measurement_fields.iter().any(|field| {
            lower.contains(&field.to_lowercase()) || normalized == normalize(field)
        })
    }

    pub fn is_non_measurement_name(&self, name: &str) -> bool {
        contains_any(name, &self.non_measurement_fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_matching() {
        let v = FieldVocabulary::default();
        // substring, case-insensitive
        assert!(v.is_measurement_name("airTemperature"));
        assert!(v.is_measurement_name("AIRTEMPERATURE_avg"));
        assert!(v.is_measurement_name("R.Humidity"));
        // normalized equality
        assert!(v.is_measurement_name("wind_speed"));
        assert!(v.is_measurement_name("X_orintation"));
        assert!(v.is_measurement_name("strike distance"));
        assert!(!v.is_measurement_name("humidity"));
        assert!(!v.is_measurement_name("station"));
    }

    #[test]
    fn test_non_measurement_fragments() {
        let v = FieldVocabulary::default();
        assert!(v.is_non_measurement_name("deviceName"));
        assert!(v.is_non_measurement_name("stationId"));
        assert!(v.is_non_measurement_name("Date"));
        assert!(!v.is_non_measurement_name("value"));
    }

    #[test]
    fn test_deserialize_partial_config() -> Result<(), serde_json::Error> {
        let v: FieldVocabulary = serde_json::from_str(r#"{"measurementFields":["uv"]}"#)?;
        assert_eq!(v.measurement_fields, ["uv"]);
        assert_eq!(v.temporal_fragments, FieldVocabulary::default().temporal_fragments);
        Ok(())
    }
}
