//! Synthetic station data, offered when the live source is unavailable.

use crate::types::dataset::Dataset;
use crate::types::record::Record;
use crate::types::value::Value;
use chrono::{DateTime, Duration, Utc};

/// Rows produced by [`crate::DataService::load_sample`].
pub const DEFAULT_SAMPLE_ROWS: usize = 100;

/// (field, minimum, span) for every generated measurement.
const SAMPLE_FIELDS: &[(&str, f64, f64)] = &[
    ("solar", 0.0, 1000.0),
    ("precipitation", 0.0, 10.0),
    ("strikes", 0.0, 5.0),
    ("strikeDistance", 0.0, 20.0),
    ("windSpeed", 0.0, 15.0),
    ("windDirection", 0.0, 360.0),
    ("gustWindSpeed", 0.0, 25.0),
    ("airTemperature", 15.0, 15.0),
    ("Vapor pressure", 0.0, 3.0),
    ("atmosphericPressure", 990.0, 40.0),
    ("R.Humidity", 30.0, 70.0),
    ("sensorTemp", 10.0, 20.0),
    ("X orintation", -10.0, 20.0),
    ("Y orintation", -10.0, 20.0),
    ("compassHeading", 0.0, 360.0),
];

/// Generates `rows` hourly records ending at `now` and going backwards in time.
///
/// Values follow smooth daily-ish waves within each field's plausible range, so
/// the output is deterministic for a given `now` and `rows`. `strikes` is a
/// whole-number count.
///
/// # Examples
///
/// ```
/// use weather_dashboard::generate_sample_dataset;
/// use chrono::Utc;
///
/// let sample = generate_sample_dataset(Utc::now(), 24);
/// assert_eq!(sample.len(), 24);
/// assert_eq!(sample.columns()[0], "timestamp");
/// ```
pub fn generate_sample_dataset(now: DateTime<Utc>, rows: usize) -> Dataset {
    (0..rows)
        .map(|i| {
            let mut record = Record::with_capacity(SAMPLE_FIELDS.len() + 1);
            record.insert("timestamp", Value::Temporal(now - Duration::hours(i as i64)));
            for (field_index, (field, min, span)) in SAMPLE_FIELDS.iter().enumerate() {
                let phase = field_index as f64 * 0.7;
                let t = i as f64;
                // Two incommensurate waves keep the series from looking periodic.
                let unit = 0.5
                    + 0.35 * (t * std::f64::consts::TAU / 24.0 + phase).sin()
                    + 0.15 * (t * 0.37 + phase * 1.3).cos();
                let mut value = min + span * unit.clamp(0.0, 1.0);
                if *field == "strikes" {
                    value = value.floor();
                }
                record.insert(*field, Value::Number(value));
            }
            record
        })
        .collect()
}
