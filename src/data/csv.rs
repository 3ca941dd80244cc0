//! CSV file parsing for grouped measurements.
//!
//! Input is a plain comma-separated table with one observation per row:
//! a group-label column and a numeric measurement column, selected by
//! header name. Any additional covariate columns are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{DataError, Dataset};

/// Load grouped measurements from a CSV file, selecting columns by name.
///
/// The first line must be a header. Column lookup is exact after trimming
/// surrounding whitespace. Empty lines are skipped; every other line must
/// have at least as many fields as the rightmost selected column.
///
/// # Arguments
/// * `path` - Path to the CSV file
/// * `group_column` - Header name of the group-label column
/// * `value_column` - Header name of the numeric measurement column
///
/// # Errors
///
/// Returns `DataError` if the file cannot be read, a column is missing,
/// a value fails to parse as a finite number, or the resulting table
/// fails dataset validation (too few groups, degenerate group).
pub fn load_csv(
    path: &Path,
    group_column: &str,
    value_column: &str,
) -> Result<Dataset, DataError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => {
                return Err(DataError::Parse {
                    line: 1,
                    message: "file is empty".to_string(),
                })
            }
        }
    };

    let columns: Vec<String> = header.split(',').map(|c| c.trim().to_string()).collect();
    let group_idx = find_column(&columns, group_column)?;
    let value_idx = find_column(&columns, value_column)?;

    let mut labels = Vec::new();
    let mut values = Vec::new();

    for (line_num, line_result) in lines {
        let line = line_result?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        let needed = group_idx.max(value_idx) + 1;
        if fields.len() < needed {
            return Err(DataError::Parse {
                line: line_num + 1,
                message: format!("expected at least {} columns, got {}", needed, fields.len()),
            });
        }

        let label = fields[group_idx].trim();
        let value_str = fields[value_idx].trim();

        let value: f64 = value_str.parse().map_err(|_| DataError::InvalidValue {
            line: line_num + 1,
            value: value_str.to_string(),
        })?;
        if !value.is_finite() {
            return Err(DataError::InvalidValue {
                line: line_num + 1,
                value: value_str.to_string(),
            });
        }

        labels.push(label.to_string());
        values.push(value);
    }

    Dataset::new(labels, values).map(|d| d.with_source(path.to_string_lossy()))
}

/// Load grouped measurements from a two-column CSV file.
///
/// Column 1 is the group label, column 2 the measurement. Useful for
/// headerless exports; pass `has_header` to skip the first line.
pub fn load_two_column_csv(path: &Path, has_header: bool) -> Result<Dataset, DataError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut labels = Vec::new();
    let mut values = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if has_header && line_num == 0 {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 2 {
            return Err(DataError::Parse {
                line: line_num + 1,
                message: format!("expected 2 columns, got {}", fields.len()),
            });
        }

        let value_str = fields[1].trim();
        let value: f64 = value_str.parse().map_err(|_| DataError::InvalidValue {
            line: line_num + 1,
            value: value_str.to_string(),
        })?;
        if !value.is_finite() {
            return Err(DataError::InvalidValue {
                line: line_num + 1,
                value: value_str.to_string(),
            });
        }

        labels.push(fields[0].trim().to_string());
        values.push(value);
    }

    Dataset::new(labels, values).map(|d| d.with_source(path.to_string_lossy()))
}

fn find_column(columns: &[String], name: &str) -> Result<usize, DataError> {
    columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| DataError::MissingColumn {
            name: name.to_string(),
            found: columns.to_vec(),
        })
}
