use crate::types::column_kind::{ColumnClassification, ColumnKind};
use crate::types::dataset::Dataset;
use crate::types::value::Value;
use polars::prelude::*;

/// Builds a polars [`DataFrame`] with one typed column per classified column.
///
/// * Numeric → `Float64`
/// * Temporal → `Datetime(Milliseconds)`, naive UTC
/// * Text → `String`, other values rendered as text
///
/// Cells that do not fit the column type, and missing cells, become null.
///
/// # Errors
///
/// Returns a [`PolarsError`] if the columns cannot be assembled into a frame.
///
/// # Examples
///
/// ```
/// use weather_dashboard::{classify, coerce, parse_csv, to_dataframe, FieldVocabulary};
///
/// let raw = parse_csv("timestamp,solar\n2024-01-01T00:00:00Z,12.3\n").unwrap();
/// let classification = classify(&raw, &FieldVocabulary::default());
/// let dataset = coerce(&raw, &classification);
///
/// let df = to_dataframe(&dataset, &classification).unwrap();
/// assert_eq!(df.shape(), (1, 2));
/// ```
pub fn to_dataframe(
    dataset: &Dataset,
    classification: &ColumnClassification,
) -> PolarsResult<DataFrame> {
    let mut columns = Vec::with_capacity(classification.len());
    for (name, kind) in classification.iter() {
        let cells = dataset.iter().map(|record| record.get(name));
        let series = match kind {
            ColumnKind::Numeric => {
                let values: Vec<Option<f64>> = cells.map(|v| v.and_then(Value::as_number)).collect();
                Series::new(name.into(), values)
            }
            ColumnKind::Temporal => {
                let millis: Vec<Option<i64>> = cells
                    .map(|v| v.and_then(Value::as_temporal).map(|dt| dt.timestamp_millis()))
                    .collect();
                Series::new(name.into(), millis)
                    .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
            }
            ColumnKind::Text => {
                let values: Vec<Option<String>> = cells.map(|v| v.map(Value::to_string)).collect();
                Series::new(name.into(), values)
            }
        };
        columns.push(Column::from(series));
    }
    DataFrame::new(columns)
}

/// [`to_dataframe`] as a [`LazyFrame`], for filtering and aggregation before collecting.
pub fn to_lazy_frame(
    dataset: &Dataset,
    classification: &ColumnClassification,
) -> PolarsResult<LazyFrame> {
    Ok(to_dataframe(dataset, classification)?.lazy())
}
