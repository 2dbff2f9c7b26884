use crate::types::dataset::Dataset;
use std::fmt;

/// Qualitative reading of a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationStrength {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
    None,
}

impl CorrelationStrength {
    pub fn from_coefficient(r: f64) -> Self {
        let r = r.abs();
        if r > 0.9 {
            CorrelationStrength::VeryStrong
        } else if r > 0.7 {
            CorrelationStrength::Strong
        } else if r > 0.5 {
            CorrelationStrength::Moderate
        } else if r > 0.3 {
            CorrelationStrength::Weak
        } else {
            CorrelationStrength::None
        }
    }
}

/// Human-readable interpretation, e.g. "Strong negative correlation".
pub fn describe_correlation(r: f64) -> String {
    let direction = if r > 0.0 { "positive" } else { "negative" };
    match CorrelationStrength::from_coefficient(r) {
        CorrelationStrength::VeryStrong => format!("Very strong {direction} correlation"),
        CorrelationStrength::Strong => format!("Strong {direction} correlation"),
        CorrelationStrength::Moderate => format!("Moderate {direction} correlation"),
        CorrelationStrength::Weak => format!("Weak {direction} correlation"),
        CorrelationStrength::None => "Little to no correlation".to_string(),
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CorrelationStrength::VeryStrong => "very strong",
            CorrelationStrength::Strong => "strong",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::None => "none",
        };
        f.write_str(label)
    }
}

/// Pearson correlation between two columns over the rows where both hold numbers.
///
/// Returns `0.0` with fewer than two such rows or when either column has no variance.
///
/// # Examples
///
/// ```
/// use weather_dashboard::{parse_csv, pearson};
///
/// let dataset = parse_csv("solar,sensorTemp\n0,10\n500,20\n1000,30\n").unwrap();
/// assert!((pearson(&dataset, "solar", "sensorTemp") - 1.0).abs() < 1e-12);
/// ```
pub fn pearson(dataset: &Dataset, x_column: &str, y_column: &str) -> f64 {
    let pairs: Vec<(f64, f64)> = dataset
        .iter()
        .filter_map(|record| {
            let x = record.get(x_column)?.as_number()?;
            let y = record.get(y_column)?.as_number()?;
            Some((x, y))
        })
        .collect();
    pearson_pairs(&pairs)
}

/// [`pearson`] over already paired values.
pub fn pearson_pairs(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return 0.0;
    }
    let n = pairs.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx, mut sum_yy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
        sum_yy += y * y;
    }
    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_xx - sum_x * sum_x) * (n * sum_yy - sum_y * sum_y)).sqrt();
    if denominator == 0.0 || denominator.is_nan() {
        return 0.0;
    }
    numerator / denominator
}
