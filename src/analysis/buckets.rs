use crate::types::dataset::Dataset;
use crate::types::value::{parse_number, Value};
use std::collections::HashMap;

/// Sum of one column over the rows falling on the same day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    /// `YYYY-MM-DD` for timestamps and ISO-like text, otherwise the raw value.
    pub day: String,
    pub total: f64,
    pub rows: usize,
}

/// Groups rows by the calendar day of `time_column` and sums `value_column`.
///
/// Buckets come out in the order their day is first seen. Text values are
/// parsed as numbers and count as `0` when they are not numeric. Rows without
/// a `time_column` value are skipped.
///
/// # Examples
///
/// ```
/// use weather_dashboard::{bucket_by_day, classify, coerce, parse_csv, FieldVocabulary};
///
/// let raw = parse_csv("timestamp,precipitation\n\
///     2024-01-01T01:00:00Z,1.5\n\
///     2024-01-01T02:00:00Z,2\n\
///     2024-01-02T01:00:00Z,0.5\n").unwrap();
/// let dataset = coerce(&raw, &classify(&raw, &FieldVocabulary::default()));
///
/// let buckets = bucket_by_day(&dataset, "timestamp", "precipitation");
/// assert_eq!(buckets.len(), 2);
/// assert_eq!(buckets[0].day, "2024-01-01");
/// assert_eq!(buckets[0].total, 3.5);
/// assert_eq!(buckets[0].rows, 2);
/// ```
pub fn bucket_by_day(dataset: &Dataset, time_column: &str, value_column: &str) -> Vec<DayBucket> {
    let mut buckets: Vec<DayBucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in dataset {
        let Some(time) = record.get(time_column) else {
            continue;
        };
        let day = day_key(time);
        let value = record.get(value_column).map_or(0.0, numeric_or_zero);

        let slot = *index.entry(day.clone()).or_insert_with(|| {
            buckets.push(DayBucket {
                day,
                total: 0.0,
                rows: 0,
            });
            buckets.len() - 1
        });
        buckets[slot].total += value;
        buckets[slot].rows += 1;
    }
    buckets
}

fn day_key(value: &Value) -> String {
    match value {
        Value::Temporal(dt) => dt.format("%Y-%m-%d").to_string(),
        Value::Text(s) => match s.split_once('T') {
            Some((day, _)) => day.to_string(),
            None => s.clone(),
        },
        Value::Number(_) => value.to_string(),
    }
}

fn numeric_or_zero(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        Value::Text(s) => parse_number(s).unwrap_or(0.0),
        Value::Temporal(_) => 0.0,
    }
}
