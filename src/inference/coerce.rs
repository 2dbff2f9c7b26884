use crate::inference::temporal::parse_temporal;
use crate::types::column_kind::{ColumnClassification, ColumnKind};
use crate::types::dataset::Dataset;
use crate::types::value::{parse_number, Value};

/// Rewrites `dataset` according to `classification`, returning a new dataset.
///
/// * Numeric columns: numbers are kept, text is parsed as a number with
///   empty or unparseable text becoming `0`, timestamps become epoch
///   milliseconds.
/// * Temporal columns: date-like text becomes a timestamp; anything else is
///   kept verbatim.
/// * Text columns, and columns the classification does not know, are untouched.
///
/// A malformed cell never fails the batch, and coercing an already coerced
/// dataset changes nothing.
///
/// # Examples
///
/// ```
/// use weather_dashboard::{classify, coerce, parse_csv, FieldVocabulary, Value};
///
/// let dataset = parse_csv("timestamp,solar\n2024-01-01T00:00:00Z,12.3\n2024-01-01T01:00:00Z,abc\n").unwrap();
/// let classification = classify(&dataset, &FieldVocabulary::default());
/// let coerced = coerce(&dataset, &classification);
///
/// assert_eq!(coerced.records()[0].get("solar"), Some(&Value::Number(12.3)));
/// assert_eq!(coerced.records()[1].get("solar"), Some(&Value::Number(0.0)));
/// assert!(coerced.records()[0].get("timestamp").unwrap().as_temporal().is_some());
/// assert_eq!(coerce(&coerced, &classification), coerced);
/// ```
pub fn coerce(dataset: &Dataset, classification: &ColumnClassification) -> Dataset {
    let mut coerced = dataset.clone();
    coerce_in_place(&mut coerced, classification);
    coerced
}

/// In-place variant of [`coerce`] for callers that own the dataset.
pub fn coerce_in_place(dataset: &mut Dataset, classification: &ColumnClassification) {
    for record in dataset.records_mut() {
        for (column, value) in record.iter_mut() {
            match classification.kind_of(column) {
                Some(ColumnKind::Numeric) => coerce_numeric(value),
                Some(ColumnKind::Temporal) => coerce_temporal(value),
                Some(ColumnKind::Text) | None => {}
            }
        }
    }
}

fn coerce_numeric(value: &mut Value) {
    let number = match value {
        Value::Number(_) => return,
        Value::Text(s) => parse_number(s).unwrap_or(0.0),
        Value::Temporal(dt) => dt.timestamp_millis() as f64,
    };
    *value = Value::Number(number);
}

fn coerce_temporal(value: &mut Value) {
    if let Value::Text(s) = value {
        if let Some(dt) = parse_temporal(s) {
            *value = Value::Temporal(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::Record;
    use chrono::{TimeZone, Utc};

    fn classification() -> ColumnClassification {
        [
            ("timestamp", ColumnKind::Temporal),
            ("solar", ColumnKind::Numeric),
            ("station", ColumnKind::Text),
        ]
        .into_iter()
        .collect()
    }

    fn row(ts: Value, solar: Value, station: Value) -> Record {
        [("timestamp", ts), ("solar", solar), ("station", station)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_numeric_defaults() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let d: Dataset = vec![
            row(Value::text("x"), Value::text(" 4.5 "), Value::text("a")),
            row(Value::text("x"), Value::text(""), Value::text("b")),
            row(Value::text("x"), Value::text("n/a"), Value::text("c")),
            row(Value::text("x"), Value::Temporal(dt), Value::text("d")),
        ]
        .into();

        let out = coerce(&d, &classification());
        let solar: Vec<&Value> = out.column_values("solar").collect();
        assert_eq!(
            solar,
            [
                &Value::Number(4.5),
                &Value::Number(0.0),
                &Value::Number(0.0),
                &Value::Number(dt.timestamp_millis() as f64)
            ]
        );
    }

    #[test]
    fn test_temporal_keeps_unparseable_text() {
        let d: Dataset = vec![
            row(Value::text("2024-01-01 06:00"), Value::Number(1.0), Value::text("12")),
            row(Value::text("soon"), Value::Number(2.0), Value::text("x")),
            row(Value::Number(7.0), Value::Number(3.0), Value::text("y")),
        ]
        .into();

        let out = coerce(&d, &classification());
        let ts: Vec<&Value> = out.column_values("timestamp").collect();
        assert_eq!(
            ts,
            [
                &Value::Temporal(Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap()),
                &Value::text("soon"),
                &Value::Number(7.0)
            ]
        );
        // Text columns are never touched, even when they look numeric.
        assert_eq!(out.records()[0].get("station"), Some(&Value::text("12")));
    }

    #[test]
    fn test_idempotent() {
        let d: Dataset = vec![
            row(Value::text("2024-01-01"), Value::text("abc"), Value::text("a")),
            row(Value::text("bad"), Value::text("3"), Value::Number(9.0)),
        ]
        .into();
        let c = classification();
        let once = coerce(&d, &c);
        assert_eq!(coerce(&once, &c), once);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let d: Dataset = vec![row(Value::text("2024-01-01"), Value::text("3"), Value::text("a"))].into();
        let _ = coerce(&d, &classification());
        assert_eq!(d.records()[0].get("solar"), Some(&Value::text("3")));
    }
}
