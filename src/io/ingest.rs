//! CSV ingest of the measurement table.
//!
//! The table has a header row naming each column (`T`, `t`, `n`, `D`, `S`,
//! `PX`, …) followed by one row per observation. A run selects a half-open
//! range of data rows, so one file can hold both the fitting rows and the
//! hold-out rows.
//!
//! Design goals:
//! - **Case-sensitive names** (`T` and `t` are different variables)
//! - **Lazy cell errors**: a non-numeric column only fails when it is used
//! - **Deterministic behavior**: no reordering, no imputation

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::{RowRange, Variable};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    values: Vec<f64>,
    /// First unparsable cell, reported when the column is requested.
    invalid: Option<String>,
}

/// Named numeric columns over a selected range of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: RowRange,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset from in-memory columns of equal length.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self, AppError> {
        let n_rows = columns.first().map_or(0, |(_, v)| v.len());
        let mut seen = HashSet::new();
        for (name, values) in &columns {
            if !seen.insert(name.as_str()) {
                return Err(AppError::new(2, format!("Duplicate column '{name}'.")));
            }
            if values.len() != n_rows {
                return Err(AppError::new(
                    2,
                    format!("Column '{name}' has {} rows, expected {n_rows}.", values.len()),
                ));
            }
        }

        Ok(Self {
            columns: columns
                .into_iter()
                .map(|(name, values)| Column {
                    name,
                    values,
                    invalid: None,
                })
                .collect(),
            rows: RowRange::new(0, n_rows),
            n_rows,
        })
    }

    /// Number of observations actually loaded.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// The requested row range.
    pub fn rows(&self) -> RowRange {
        self.rows
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Values of a column; fails on unknown names and non-numeric cells.
    pub fn column(&self, name: &str) -> Result<&[f64], AppError> {
        let column = self
            .columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| {
                let known: Vec<&str> = self.column_names().collect();
                AppError::new(
                    2,
                    format!("Unknown column '{name}' (available: {}).", known.join(", ")),
                )
            })?;
        if let Some(reason) = &column.invalid {
            return Err(AppError::new(2, reason.clone()));
        }
        Ok(&column.values)
    }

    /// Base variables in the requested order.
    pub fn variables(&self, names: &[String]) -> Result<Vec<Variable>, AppError> {
        names
            .iter()
            .map(|name| Ok(Variable::new(name.clone(), self.column(name)?.to_vec())))
            .collect()
    }
}

/// Load `rows` of the CSV file at `path`.
pub fn load_dataset(path: &Path, rows: RowRange) -> Result<Dataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    debug!(path = %path.display(), %rows, "loading dataset");
    load_dataset_from_reader(file, rows)
}

/// Load `rows` of CSV data from any reader.
pub fn load_dataset_from_reader<R: Read>(reader: R, rows: RowRange) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let mut columns = Vec::with_capacity(headers.len());
    let mut seen = HashSet::new();
    for name in headers.iter() {
        let name = normalize_header_name(name);
        if name.is_empty() {
            return Err(AppError::new(2, "CSV header contains an empty column name."));
        }
        if !seen.insert(name.clone()) {
            return Err(AppError::new(2, format!("Duplicate CSV column '{name}'.")));
        }
        columns.push(Column {
            name,
            values: Vec::with_capacity(rows.len()),
            invalid: None,
        });
    }

    let mut n_rows = 0usize;
    for (idx, result) in reader.records().enumerate() {
        if idx >= rows.end {
            break;
        }
        if !rows.contains(idx) {
            continue;
        }
        // +2: records() starts after the header and CSV lines are 1-based.
        let line = idx + 2;

        let record =
            result.map_err(|e| AppError::new(2, format!("CSV parse error on line {line}: {e}")))?;

        for (col_idx, column) in columns.iter_mut().enumerate() {
            let cell = record.get(col_idx).unwrap_or("");
            match parse_cell(cell) {
                Some(v) => column.values.push(v),
                None => {
                    column.values.push(f64::NAN);
                    if column.invalid.is_none() {
                        column.invalid = Some(format!(
                            "Invalid number '{cell}' in column '{}' on line {line}.",
                            column.name
                        ));
                    }
                }
            }
        }
        n_rows += 1;
    }

    if n_rows == 0 {
        return Err(AppError::new(3, format!("No data rows in range {rows}.")));
    }
    if n_rows < rows.len() {
        warn!(requested = rows.len(), loaded = n_rows, "row range extends past end of file");
    }

    Ok(Dataset {
        columns,
        rows,
        n_rows,
    })
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn parse_cell(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
