//! CSV parser producing typed, ordered rows

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::types::{CellValue, Row};

/// Tokens read as missing values
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Inferred type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Text,
}

/// CSV parser
///
/// The first non-blank line is the header. Short rows are padded with nulls,
/// long rows are rejected, and each column is typed as integer, float or
/// text from its non-null cells.
pub struct CsvParser;

impl CsvParser {
    /// Parse CSV bytes into rows
    pub fn parse(filename: &str, data: &[u8]) -> Result<Vec<Row>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut records = reader
            .records()
            .filter(|result| !matches!(result, Ok(record) if is_blank(record)));

        let header = match records.next() {
            Some(result) => result.map_err(|e| Self::csv_error(filename, e))?,
            None => return Err(Error::parse(filename, "No columns to parse from file")),
        };
        let columns = dedupe_columns(header.iter());
        let width = columns.len();

        // Raw cells, `None` for missing or NA
        let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
        for result in records {
            let record = result.map_err(|e| Self::csv_error(filename, e))?;

            if record.len() > width {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                return Err(Error::parse(
                    filename,
                    format!(
                        "Expected {} fields in line {}, saw {}",
                        width,
                        line,
                        record.len()
                    ),
                ));
            }

            let mut cells: Vec<Option<String>> = record
                .iter()
                .map(|field| {
                    if NA_TOKENS.contains(&field) {
                        None
                    } else {
                        Some(field.to_string())
                    }
                })
                .collect();
            cells.resize(width, None);
            raw_rows.push(cells);
        }

        let kinds: Vec<ColumnKind> = (0..width)
            .map(|col| infer_kind(raw_rows.iter().filter_map(|row| row[col].as_deref())))
            .collect();

        let rows = raw_rows
            .into_iter()
            .map(|cells| {
                columns
                    .iter()
                    .zip(kinds.iter())
                    .zip(cells)
                    .map(|((name, kind), cell)| (name.clone(), to_value(cell, *kind)))
                    .collect::<Row>()
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "Parsed '{}': {} columns, {} rows",
            filename,
            width,
            rows.len()
        );

        Ok(rows)
    }

    fn csv_error(filename: &str, err: csv::Error) -> Error {
        match err.kind() {
            csv::ErrorKind::Utf8 { .. } => {
                Error::parse(filename, format!("File is not valid UTF-8: {}", err))
            }
            _ => Error::parse(filename, err.to_string()),
        }
    }
}

/// A record whose fields are all empty or whitespace
fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

/// Name empty headers `Unnamed: {index}`, then make names unique:
/// `a, a, a` becomes `a, a.1, a.2`
fn dedupe_columns<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::new();

    for (index, name) in names.enumerate() {
        let name = if name.is_empty() {
            format!("Unnamed: {}", index)
        } else {
            name.to_string()
        };
        let mut candidate = name.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", name, suffix);
            suffix += 1;
        }
        seen.insert(candidate.clone());
        columns.push(candidate);
    }

    columns
}

fn infer_kind<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut kind = ColumnKind::Integer;

    for cell in cells {
        let trimmed = cell.trim();
        match kind {
            ColumnKind::Integer if trimmed.parse::<i64>().is_ok() => {}
            ColumnKind::Integer | ColumnKind::Float if parse_finite(trimmed).is_some() => {
                kind = ColumnKind::Float;
            }
            _ => return ColumnKind::Text,
        }
    }

    kind
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn to_value(cell: Option<String>, kind: ColumnKind) -> CellValue {
    let Some(cell) = cell else {
        return CellValue::Null;
    };

    match kind {
        ColumnKind::Integer => cell
            .trim()
            .parse::<i64>()
            .map(CellValue::Integer)
            .unwrap_or(CellValue::Text(cell)),
        ColumnKind::Float => parse_finite(cell.trim())
            .map(CellValue::Float)
            .unwrap_or(CellValue::Text(cell)),
        ColumnKind::Text => CellValue::Text(cell),
    }
}
