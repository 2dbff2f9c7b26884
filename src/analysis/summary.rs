use crate::types::column_kind::ColumnClassification;
use crate::types::dataset::Dataset;

/// Direction of a column between the first and second half of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

/// Statistics over the numeric values of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Percent change of the second-half mean over the first-half mean.
    pub change_percent: f64,
    pub trend: Trend,
}

/// Summarizes the numeric values of `column`, in row order.
///
/// Returns `None` when the column holds no numeric values. The first half is
/// the first `count / 2` values; when it is empty or its mean is zero the
/// change is reported as `0` with a neutral trend.
///
/// # Examples
///
/// ```
/// use weather_dashboard::{parse_csv, summarize, Trend};
///
/// let dataset = parse_csv("solar\n10\n10\n20\n20\n").unwrap();
/// let summary = summarize(&dataset, "solar").unwrap();
/// assert_eq!(summary.mean, 15.0);
/// assert_eq!(summary.change_percent, 100.0);
/// assert_eq!(summary.trend, Trend::Up);
/// ```
pub fn summarize(dataset: &Dataset, column: &str) -> Option<ColumnSummary> {
    let values: Vec<f64> = dataset
        .column_values(column)
        .filter_map(|v| v.as_number())
        .filter(|n| !n.is_nan())
        .collect();
    if values.is_empty() {
        return None;
    }

    let mean = mean_of(&values);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (first, second) = values.split_at(values.len() / 2);
    let change_percent = if first.is_empty() {
        0.0
    } else {
        let first_mean = mean_of(first);
        if first_mean == 0.0 {
            0.0
        } else {
            (mean_of(second) - first_mean) / first_mean * 100.0
        }
    };
    let trend = if change_percent > 0.0 {
        Trend::Up
    } else if change_percent < 0.0 {
        Trend::Down
    } else {
        Trend::Neutral
    };

    Some(ColumnSummary {
        column: column.to_string(),
        count: values.len(),
        mean,
        min,
        max,
        change_percent,
        trend,
    })
}

/// Summaries of the first `limit` numeric columns that hold any numbers.
pub fn summarize_numeric(
    dataset: &Dataset,
    classification: &ColumnClassification,
    limit: usize,
) -> Vec<ColumnSummary> {
    classification
        .numeric_columns()
        .into_iter()
        .take(limit)
        .filter_map(|column| summarize(dataset, column))
        .collect()
}

fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
