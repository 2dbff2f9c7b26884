//! Decides, per column, whether a dataset column is numeric, temporal or text.
//!
//! Classification combines field-name knowledge ([`FieldVocabulary`]) with a
//! sample of the values, in a fixed precedence:
//!
//! 1. columns whose name looks temporal (`time`, `date`, `timestamp`) are
//!    temporal and never numeric;
//! 2. columns matching the measurement vocabulary are numeric;
//! 3. columns with a number among their first [`SAMPLE_ROWS`] values are numeric;
//! 4. if nothing is numeric yet, every remaining column not named like a
//!    time/date/name/id is numeric, and failing that the first remaining column;
//! 5. if no column is temporal by name, the first column is the time axis. It
//!    keeps the numeric kind if it earned one above and is temporal otherwise.
//!
//! Everything else is text.

use crate::types::column_kind::{ColumnClassification, ColumnKind};
use crate::types::dataset::Dataset;
use crate::types::vocabulary::FieldVocabulary;
use log::debug;

/// Number of leading rows inspected for numeric values.
pub const SAMPLE_ROWS: usize = 10;

/// Classifies every column of `dataset`'s schema.
///
/// An empty dataset yields an empty classification.
///
/// # Examples
///
/// ```
/// use weather_dashboard::{classify, parse_csv, ColumnKind, FieldVocabulary};
///
/// let dataset = parse_csv("timestamp,airTemperature,station\n2024-01-01T00:00:00Z,\"21.5\",ML-417\n").unwrap();
/// let classification = classify(&dataset, &FieldVocabulary::default());
///
/// assert_eq!(classification.kind_of("timestamp"), Some(ColumnKind::Temporal));
/// assert_eq!(classification.kind_of("airTemperature"), Some(ColumnKind::Numeric));
/// assert_eq!(classification.kind_of("station"), Some(ColumnKind::Text));
/// ```
pub fn classify(dataset: &Dataset, vocabulary: &FieldVocabulary) -> ColumnClassification {
    let columns = dataset.columns();
    let mut classification: ColumnClassification = columns
        .iter()
        .map(|name| (name.as_str(), ColumnKind::Text))
        .collect();

    for name in &columns {
        if vocabulary.is_temporal_name(name) {
            classification.set(name.as_str(), ColumnKind::Temporal);
        }
    }
    // Without a temporal name the first column becomes the time axis, but it
    // still competes for the numeric kind like any other column.
    let fallback_axis = if classification.temporal_columns().is_empty() {
        columns.first().cloned()
    } else {
        None
    };

    let candidates: Vec<&String> = columns
        .iter()
        .filter(|name| !classification.is_temporal(name))
        .collect();

    let sample = &dataset.records()[..dataset.len().min(SAMPLE_ROWS)];
    let mut any_numeric = false;
    for name in &candidates {
        let by_vocabulary = vocabulary.is_measurement_name(name);
        let by_sample = sample
            .iter()
            .any(|record| record.get(name).is_some_and(|v| v.is_number()));
        if by_vocabulary || by_sample {
            classification.set(name.as_str(), ColumnKind::Numeric);
            any_numeric = true;
        }
    }

    if !any_numeric {
        let forced: Vec<&&String> = candidates
            .iter()
            .filter(|name| Some(name.as_str()) != fallback_axis.as_deref())
            .filter(|name| !vocabulary.is_non_measurement_name(name))
            .collect();
        if forced.is_empty() {
            if let Some(first) = candidates.first() {
                debug!("Forcing first non-temporal column '{}' numeric", first);
                classification.set(first.as_str(), ColumnKind::Numeric);
            }
        } else {
            debug!("Forcing numeric columns: {:?}", forced);
            for name in forced {
                classification.set(name.as_str(), ColumnKind::Numeric);
            }
        }
    }

    if let Some(axis) = fallback_axis {
        debug!("No temporal column by name, using first column '{}' as time axis", axis);
        if classification.is_numeric(&axis) {
            classification.set_time_column(axis);
        } else {
            classification.set(axis, ColumnKind::Temporal);
        }
    }

    classification
}
