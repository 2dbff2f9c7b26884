//! Column classification: which columns hold measurements, which hold
//! timestamps and which are opaque text.

use std::collections::BTreeMap;
use std::fmt;

/// The semantic kind assigned to a whole column by [`crate::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Measurement data; every value is coerced to a number.
    Numeric,
    /// Points in time; date-like text is coerced to a timestamp.
    Temporal,
    /// Left untouched.
    Text,
}

impl ColumnKind {
    /// The type tag written to `time-series-metadata.json`.
    pub fn type_tag(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "number",
            ColumnKind::Temporal => "date",
            ColumnKind::Text => "string",
        }
    }

    pub(crate) fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            "number" => Some(ColumnKind::Numeric),
            "date" => Some(ColumnKind::Temporal),
            "string" => Some(ColumnKind::Text),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_tag())
    }
}

/// Column name → [`ColumnKind`], in schema order.
///
/// Derived from a dataset, never stored alongside it. Consumers must not assume
/// anything about a column beyond what this classification reports.
///
/// # Examples
///
/// ```
/// use weather_dashboard::{ColumnClassification, ColumnKind};
///
/// let classification: ColumnClassification = [
///     ("timestamp", ColumnKind::Temporal),
///     ("solar", ColumnKind::Numeric),
///     ("station", ColumnKind::Text),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(classification.time_column(), Some("timestamp"));
/// assert_eq!(classification.numeric_columns(), ["solar"]);
/// assert_eq!(classification.kind_of("station"), Some(ColumnKind::Text));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnClassification {
    columns: Vec<(String, ColumnKind)>,
    time_axis: Option<String>,
}

impl ColumnClassification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the kind of `column`, keeping its position if already present.
    pub fn set(&mut self, column: impl Into<String>, kind: ColumnKind) {
        let column = column.into();
        match self.columns.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = kind,
            None => self.columns.push((column, kind)),
        }
    }

    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, kind)| *kind)
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.kind_of(column) == Some(ColumnKind::Numeric)
    }

    pub fn is_temporal(&self, column: &str) -> bool {
        self.kind_of(column) == Some(ColumnKind::Temporal)
    }

    fn columns_of(&self, kind: ColumnKind) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|(_, k)| *k == kind)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns_of(ColumnKind::Numeric)
    }

    pub fn temporal_columns(&self) -> Vec<&str> {
        self.columns_of(ColumnKind::Temporal)
    }

    pub fn text_columns(&self) -> Vec<&str> {
        self.columns_of(ColumnKind::Text)
    }

    /// The column charts use as their x axis.
    ///
    /// An explicitly designated column wins; otherwise the first temporal one.
    /// The designated column keeps its own kind, so it may also be numeric.
    pub fn time_column(&self) -> Option<&str> {
        self.time_axis.as_deref().or_else(|| {
            self.columns
                .iter()
                .find(|(_, k)| *k == ColumnKind::Temporal)
                .map(|(name, _)| name.as_str())
        })
    }

    /// Designates `column` as the time axis without changing its kind.
    pub fn set_time_column(&mut self, column: impl Into<String>) {
        self.time_axis = Some(column.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnKind)> {
        self.columns.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column name → `"number" | "date" | "string"`.
    pub fn type_tags(&self) -> BTreeMap<String, String> {
        self.columns
            .iter()
            .map(|(name, kind)| (name.clone(), kind.type_tag().to_string()))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, ColumnKind)> for ColumnClassification {
    fn from_iter<I: IntoIterator<Item = (K, ColumnKind)>>(iter: I) -> Self {
        let mut classification = ColumnClassification::new();
        for (column, kind) in iter {
            classification.set(column, kind);
        }
        classification
    }
}
