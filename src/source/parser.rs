//! Turns CSV text into a loosely typed [`Dataset`].
//!
//! The heavy lifting (field splitting, quoting, header handling) is done by the
//! polars CSV reader with every column read as `String`. Typing happens per
//! cell afterwards, because station CSVs mix numbers and junk in one column and
//! a columnar dtype would lose the numbers.

use crate::source::error::ParseError;
use crate::types::dataset::Dataset;
use crate::types::record::Record;
use crate::types::value::Value;
use log::debug;
use polars::prelude::*;
use std::io::Cursor;

/// Parses CSV text with a header row into a [`Dataset`].
///
/// Blank lines outside quoted fields are skipped. Each cell that parses as a
/// finite number becomes [`Value::Number`]; every other cell, including empty
/// ones, stays [`Value::Text`].
///
/// # Errors
///
/// * [`ParseError::Empty`] if the text holds no header or no data rows.
/// * [`ParseError::UnbalancedQuotes`] if a quoted field is never closed.
/// * [`ParseError::Csv`] for any fatal error of the CSV reader (e.g. a row
///   with more fields than the header, or duplicate column names).
///
/// # Examples
///
/// ```
/// use weather_dashboard::{parse_csv, Value};
///
/// let dataset = parse_csv("station,solar\n\"ML-417, roof\",12.3\n\nML-418,n/a\n").unwrap();
/// assert_eq!(dataset.len(), 2);
/// assert_eq!(dataset.columns(), ["station", "solar"]);
/// assert_eq!(dataset.records()[0].get("station"), Some(&Value::text("ML-417, roof")));
/// assert_eq!(dataset.records()[0].get("solar"), Some(&Value::Number(12.3)));
/// assert_eq!(dataset.records()[1].get("solar"), Some(&Value::text("n/a")));
/// ```
pub fn parse_csv(text: &str) -> Result<Dataset, ParseError> {
    let cleaned = strip_blank_lines(text)?;
    if cleaned.lines().count() < 2 {
        return Err(ParseError::Empty);
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        // Zero inference rows reads every column as String.
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(cleaned.into_bytes()))
        .finish()
        .map_err(ParseError::Csv)?;

    if df.height() == 0 {
        return Err(ParseError::Empty);
    }
    debug!("CSV parsed into {} rows x {} columns", df.height(), df.width());

    dataframe_to_dataset(&df).map_err(ParseError::Csv)
}

fn dataframe_to_dataset(df: &DataFrame) -> PolarsResult<Dataset> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let columns = df
        .get_columns()
        .iter()
        .map(|column| column.str())
        .collect::<PolarsResult<Vec<_>>>()?;

    let records = (0..df.height())
        .map(|row| {
            names
                .iter()
                .zip(&columns)
                .map(|(name, column)| {
                    let value = match column.get(row) {
                        Some(token) => Value::from_token(token),
                        None => Value::Text(String::new()),
                    };
                    (name.clone(), value)
                })
                .collect::<Record>()
        })
        .collect();
    Ok(records)
}

/// Drops lines that are empty or whitespace-only, without touching newlines
/// that live inside quoted fields. Also detects quotes that never close, which
/// the CSV reader would otherwise swallow up to the end of input.
fn strip_blank_lines(text: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(text.len());
    let mut record = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut line = 1;
    let mut quote_opened_on = 0;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            record.push(c);
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    // Escaped quote inside a quoted field.
                    record.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => line += 1,
                _ => {}
            }
            continue;
        }

        match c {
            '\n' => {
                flush_record(&mut record, &mut out);
                at_field_start = true;
                line += 1;
            }
            '"' if at_field_start => {
                in_quotes = true;
                quote_opened_on = line;
                at_field_start = false;
                record.push(c);
            }
            ',' => {
                at_field_start = true;
                record.push(c);
            }
            _ => {
                at_field_start = false;
                record.push(c);
            }
        }
    }

    if in_quotes {
        return Err(ParseError::UnbalancedQuotes {
            line: quote_opened_on,
        });
    }
    flush_record(&mut record, &mut out);
    Ok(out)
}

fn flush_record(record: &mut String, out: &mut String) {
    let trimmed = record.trim_end_matches('\r');
    if !trimmed.trim().is_empty() {
        out.push_str(trimmed);
        out.push('\n');
    }
    record.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_count_skips_blank_lines() -> Result<(), ParseError> {
        let csv = "timestamp,solar\n\n2024-01-01T00:00:00Z,1\n   \n2024-01-01T01:00:00Z,2\r\n\r\n2024-01-01T02:00:00Z,3\n\n";
        let dataset = parse_csv(csv)?;
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[2].get("solar"), Some(&Value::Number(3.0)));
        Ok(())
    }

    #[test]
    fn test_values_are_typed_per_cell() -> Result<(), ParseError> {
        let dataset = parse_csv("name,reading\nA,1.5\nB,abc\nC,\nD, 7 \n")?;
        let readings: Vec<&Value> = dataset.column_values("reading").collect();
        assert_eq!(
            readings,
            [
                &Value::Number(1.5),
                &Value::text("abc"),
                &Value::text(""),
                &Value::Number(7.0)
            ]
        );
        Ok(())
    }

    #[test]
    fn test_quoted_fields_keep_delimiters_and_newlines() -> Result<(), ParseError> {
        let csv = "note,value\n\"a, b\",1\n\"line one\n\nline three\",2\n\"say \"\"hi\"\"\",3\n";
        let dataset = parse_csv(csv)?;
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[0].get("note"), Some(&Value::text("a, b")));
        assert_eq!(
            dataset.records()[1].get("note"),
            Some(&Value::text("line one\n\nline three"))
        );
        assert_eq!(dataset.records()[2].get("note"), Some(&Value::text("say \"hi\"")));
        Ok(())
    }

    #[test]
    fn test_empty_inputs_fail() {
        assert!(matches!(parse_csv(""), Err(ParseError::Empty)));
        assert!(matches!(parse_csv("\n\n  \n"), Err(ParseError::Empty)));
        assert!(matches!(parse_csv("timestamp,solar\n"), Err(ParseError::Empty)));
        assert!(matches!(parse_csv("timestamp,solar\n\n\n"), Err(ParseError::Empty)));
    }

    #[test]
    fn test_unbalanced_quotes_fail() {
        let result = parse_csv("a,b\n1,2\n\"open,3\n4,5\n");
        assert!(matches!(
            result,
            Err(ParseError::UnbalancedQuotes { line: 3 })
        ));
    }

    #[test]
    fn test_stray_quote_inside_unquoted_field_is_literal() -> Result<(), ParseError> {
        let s = strip_blank_lines("size,unit\n12\" screen,in\n")?;
        assert_eq!(s, "size,unit\n12\" screen,in\n");
        Ok(())
    }

    #[test]
    fn test_schema_order_is_header_order() -> Result<(), ParseError> {
        let dataset = parse_csv("zeta,alpha,mid\n1,2,3\n")?;
        assert_eq!(dataset.columns(), ["zeta", "alpha", "mid"]);
        Ok(())
    }
}
