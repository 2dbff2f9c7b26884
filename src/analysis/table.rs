use crate::types::dataset::Dataset;
use crate::types::record::Record;
use crate::types::value::Value;
use polars::prelude::*;

/// Rows shown per table page by default.
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// Rows with any cell containing `term`, case-insensitively.
///
/// Timestamps are matched on their ISO-8601 form. An empty term matches every row.
pub fn search<'a>(dataset: &'a Dataset, term: &str) -> Vec<&'a Record> {
    let needle = term.to_lowercase();
    dataset
        .iter()
        .filter(|record| {
            record
                .iter()
                .any(|(_, value)| value.to_string().to_lowercase().contains(&needle))
        })
        .collect()
}

/// Number of pages needed for `rows` rows.
pub fn page_count(rows: usize, rows_per_page: usize) -> usize {
    if rows_per_page == 0 {
        return 0;
    }
    rows.div_ceil(rows_per_page)
}

/// The 1-based `page` of `rows`. Pages past the end are empty.
pub fn paginate<T>(rows: &[T], page: usize, rows_per_page: usize) -> &[T] {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(rows_per_page))
    else {
        return &[];
    };
    if start >= rows.len() {
        return &[];
    }
    let end = (start + rows_per_page).min(rows.len());
    &rows[start..end]
}

/// Renders `records` as CSV with a header of `columns`, through polars'
/// [`CsvWriter`].
///
/// Timestamps are written as ISO-8601. Fields containing a comma, quote or
/// line break are quoted, with inner quotes doubled. Missing cells are empty.
///
/// # Errors
///
/// Returns a [`PolarsError`] if the frame cannot be assembled or written.
///
/// # Examples
///
/// ```
/// use weather_dashboard::{parse_csv, search, to_csv};
///
/// let dataset = parse_csv("station,solar\n\"Delft, NL\",12.5\nML-417,3\n").unwrap();
/// let rows = search(&dataset, "delft");
/// assert_eq!(
///     to_csv(&dataset.columns(), &rows).unwrap(),
///     "station,solar\n\"Delft, NL\",12.5\n"
/// );
/// ```
pub fn to_csv(columns: &[String], records: &[&Record]) -> PolarsResult<String> {
    let frame_columns = columns
        .iter()
        .map(|column| {
            let cells: Vec<Option<String>> = records
                .iter()
                .map(|record| record.get(column).map(Value::to_string))
                .collect();
            Column::from(Series::new(column.as_str().into(), cells))
        })
        .collect::<Vec<_>>();
    let mut df = DataFrame::new(frame_columns)?;

    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut df)?;
    String::from_utf8(buffer).map_err(|e| PolarsError::ComputeError(e.to_string().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parser::parse_csv;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_search_is_case_insensitive() {
        let d = parse_csv("station,solar\nML-417,12\nml-418,7\nOther,417\n").unwrap();
        assert_eq!(search(&d, "ML-41").len(), 2);
        assert_eq!(search(&d, "417").len(), 2);
        assert_eq!(search(&d, "").len(), 3);
        assert!(search(&d, "zzz").is_empty());
    }

    #[test]
    fn test_search_matches_iso_timestamps() {
        let mut record = Record::new();
        record.insert(
            "timestamp",
            Value::Temporal(Utc.with_ymd_and_hms(2024, 5, 3, 10, 0, 0).unwrap()),
        );
        let d: Dataset = vec![record].into();
        assert_eq!(search(&d, "2024-05-03t10").len(), 1);
    }

    #[test]
    fn test_pagination() {
        let rows: Vec<usize> = (0..23).collect();
        assert_eq!(page_count(rows.len(), DEFAULT_ROWS_PER_PAGE), 3);
        assert_eq!(page_count(0, DEFAULT_ROWS_PER_PAGE), 0);
        assert_eq!(paginate(&rows, 1, 10), &rows[0..10]);
        assert_eq!(paginate(&rows, 3, 10), &rows[20..23]);
        assert!(paginate(&rows, 4, 10).is_empty());
        assert!(paginate(&rows, 0, 10).is_empty());
    }

    #[test]
    fn test_csv_escaping() {
        let d = parse_csv("note,value\n\"say \"\"hi\"\"\",1\n\"two\nlines\",2\n").unwrap();
        let rows: Vec<&Record> = d.iter().collect();
        assert_eq!(
            to_csv(&d.columns(), &rows).unwrap(),
            "note,value\n\"say \"\"hi\"\"\",1\n\"two\nlines\",2\n"
        );
    }

    #[test]
    fn test_csv_reads_back_through_parser() {
        let d = parse_csv(
            "station,comment,solar\n\
             ML-417,\"wind, then \"\"calm\"\"\",12.5\n\
             ML-418,\"line one\nline two\",3\n",
        )
        .unwrap();
        let rows: Vec<&Record> = d.iter().collect();
        let csv = to_csv(&d.columns(), &rows).unwrap();
        assert_eq!(parse_csv(&csv).unwrap(), d);
    }

    #[test]
    fn test_csv_missing_cells_and_timestamps() {
        let mut first = Record::new();
        first.insert(
            "timestamp",
            Value::Temporal(Utc.with_ymd_and_hms(2024, 5, 3, 10, 0, 0).unwrap()),
        );
        first.insert("solar", Value::Number(4.5));
        let mut second = Record::new();
        second.insert(
            "timestamp",
            Value::Temporal(Utc.with_ymd_and_hms(2024, 5, 3, 11, 0, 0).unwrap()),
        );
        let columns = vec!["timestamp".to_string(), "solar".to_string()];
        let csv = to_csv(&columns, &[&first, &second]).unwrap();
        assert_eq!(
            csv,
            "timestamp,solar\n2024-05-03T10:00:00.000Z,4.5\n2024-05-03T11:00:00.000Z,\n"
        );
    }

    #[test]
    fn test_csv_header_only() {
        let columns = vec!["timestamp".to_string(), "solar".to_string()];
        assert_eq!(to_csv(&columns, &[]).unwrap(), "timestamp,solar\n");
    }
}
