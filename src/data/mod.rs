//! Data loading and group encoding for measurement tables.
//!
//! This module turns a table of (group label, measured value) rows into a
//! validated [`Dataset`] ready for analysis. Rows arrive from CSV files
//! (see [`csv`]) or directly from vectors; group labels are mapped to dense
//! integer indices by a [`GroupEncoder`].
//!
//! # Example
//!
//! ```ignore
//! use bestimate::data::{load_csv, Dataset};
//! use std::path::Path;
//!
//! let data = load_csv(Path::new("measurements.csv"), "group", "value")?;
//! println!("{} observations across {} groups", data.len(), data.n_groups());
//! ```

mod csv;
mod encode;

pub use csv::{load_csv, load_two_column_csv};
pub use encode::GroupEncoder;

use std::fmt;

/// Minimum observations required per group.
///
/// A group with a single observation leaves its scale parameter
/// unidentified and is rejected at load time.
pub const MIN_GROUP_OBSERVATIONS: usize = 2;

/// Errors that can occur while loading or validating data.
#[derive(Debug)]
pub enum DataError {
    /// IO error reading file.
    Io(std::io::Error),

    /// CSV parse error at a specific line.
    Parse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Description of the parse error.
        message: String,
    },

    /// A requested column was not present in the header.
    MissingColumn {
        /// The column name that was requested.
        name: String,
        /// The column names that were actually found.
        found: Vec<String>,
    },

    /// A measurement value could not be parsed as a finite number.
    InvalidValue {
        /// Line number where the invalid value was found (1-indexed).
        line: usize,
        /// The invalid value string.
        value: String,
    },

    /// Fewer than two distinct groups were found.
    TooFewGroups {
        /// The group labels that were found.
        found: Vec<String>,
    },

    /// A group has too few observations to estimate its parameters.
    DegenerateGroup {
        /// The offending group label.
        label: String,
        /// Number of observations found for it.
        count: usize,
    },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io(e) => write!(f, "IO error: {}", e),
            DataError::Parse { line, message } => {
                write!(f, "Parse error at line {}: {}", line, message)
            }
            DataError::MissingColumn { name, found } => {
                write!(
                    f,
                    "Missing column '{}' in header. Found columns: {:?}",
                    name, found
                )
            }
            DataError::InvalidValue { line, value } => {
                write!(f, "Invalid measurement at line {}: '{}'", line, value)
            }
            DataError::TooFewGroups { found } => {
                write!(
                    f,
                    "Need at least 2 distinct groups, found {}: {:?}",
                    found.len(),
                    found
                )
            }
            DataError::DegenerateGroup { label, count } => {
                write!(
                    f,
                    "Group '{}' has {} observation(s), need at least {}",
                    label, count, MIN_GROUP_OBSERVATIONS
                )
            }
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DataError {
    fn from(e: std::io::Error) -> Self {
        DataError::Io(e)
    }
}

/// A validated set of grouped measurements.
///
/// Observations are stored flat; each carries the dense index of its group
/// as assigned by the [`GroupEncoder`]. Construction validates the
/// invariants the model relies on: at least two distinct groups, at least
/// [`MIN_GROUP_OBSERVATIONS`] per group, and all values finite.
#[derive(Debug, Clone)]
pub struct Dataset {
    values: Vec<f64>,
    group_indices: Vec<usize>,
    encoder: GroupEncoder,
    source: Option<String>,
}

impl Dataset {
    /// Build a dataset from parallel label/value vectors.
    ///
    /// # Errors
    ///
    /// Returns a `DataError` if fewer than two distinct groups are present,
    /// any group has fewer than [`MIN_GROUP_OBSERVATIONS`] observations, or
    /// any value is non-finite.
    ///
    /// # Panics
    ///
    /// Panics if `labels` and `values` have different lengths.
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Result<Self, DataError> {
        assert_eq!(
            labels.len(),
            values.len(),
            "labels and values must have the same length"
        );

        for (i, v) in values.iter().enumerate() {
            if !v.is_finite() {
                return Err(DataError::InvalidValue {
                    line: i + 1,
                    value: v.to_string(),
                });
            }
        }

        let encoder = GroupEncoder::fit(labels.iter().map(String::as_str));
        if encoder.len() < 2 {
            return Err(DataError::TooFewGroups {
                found: encoder.labels().to_vec(),
            });
        }

        // Every label came from the fitted set, so encoding cannot fail.
        let group_indices: Vec<usize> = labels
            .iter()
            .map(|l| encoder.encode(l).expect("label missing from fitted encoder"))
            .collect();

        let mut counts = vec![0usize; encoder.len()];
        for &g in &group_indices {
            counts[g] += 1;
        }
        for (k, &count) in counts.iter().enumerate() {
            if count < MIN_GROUP_OBSERVATIONS {
                return Err(DataError::DegenerateGroup {
                    label: encoder.labels()[k].clone(),
                    count,
                });
            }
        }

        Ok(Self {
            values,
            group_indices,
            encoder,
            source: None,
        })
    }

    /// Attach a source description (e.g. the file path).
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Total number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the dataset has no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct groups.
    pub fn n_groups(&self) -> usize {
        self.encoder.len()
    }

    /// All observation values, in input order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Dense group index for each observation, parallel to [`values`](Self::values).
    pub fn group_indices(&self) -> &[usize] {
        &self.group_indices
    }

    /// The fitted label encoder.
    pub fn encoder(&self) -> &GroupEncoder {
        &self.encoder
    }

    /// Group labels in encoding order.
    pub fn labels(&self) -> &[String] {
        self.encoder.labels()
    }

    /// Source description, if one was attached.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Values belonging to the group with dense index `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k` is not a valid group index.
    pub fn group_values(&self, k: usize) -> Vec<f64> {
        assert!(k < self.n_groups(), "group index out of range");
        self.values
            .iter()
            .zip(&self.group_indices)
            .filter(|(_, &g)| g == k)
            .map(|(&v, _)| v)
            .collect()
    }

    /// Number of observations in the group with dense index `k`.
    pub fn group_count(&self, k: usize) -> usize {
        self.group_indices.iter().filter(|&&g| g == k).count()
    }

    /// Mean of all observations pooled across groups.
    pub fn pooled_mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Sample standard deviation of all observations pooled across groups.
    ///
    /// Returns a small positive floor instead of zero when all observations
    /// are identical, so that data-derived prior scales stay usable.
    pub fn pooled_sd(&self) -> f64 {
        let mean = self.pooled_mean();
        let n = self.values.len();
        let var = self
            .values
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / (n - 1) as f64;
        var.sqrt().max(f64::EPSILON.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dataset_basic() {
        let data = Dataset::new(
            labels(&["a", "b", "a", "b"]),
            vec![1.0, 2.0, 3.0, 4.0],
        )
        .unwrap();

        assert_eq!(data.len(), 4);
        assert_eq!(data.n_groups(), 2);
        assert_eq!(data.group_values(0), vec![1.0, 3.0]);
        assert_eq!(data.group_values(1), vec![2.0, 4.0]);
        assert_eq!(data.group_count(0), 2);
    }

    #[test]
    fn test_dataset_rejects_single_group() {
        let result = Dataset::new(labels(&["a", "a", "a"]), vec![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(DataError::TooFewGroups { .. })));
    }

    #[test]
    fn test_dataset_rejects_degenerate_group() {
        let result = Dataset::new(
            labels(&["a", "a", "b"]),
            vec![1.0, 2.0, 3.0],
        );
        match result {
            Err(DataError::DegenerateGroup { label, count }) => {
                assert_eq!(label, "b");
                assert_eq!(count, 1);
            }
            other => panic!("Expected DegenerateGroup, got {:?}", other),
        }
    }

    #[test]
    fn test_dataset_rejects_non_finite() {
        let result = Dataset::new(
            labels(&["a", "a", "b", "b"]),
            vec![1.0, f64::NAN, 3.0, 4.0],
        );
        assert!(matches!(result, Err(DataError::InvalidValue { line: 2, .. })));
    }

    #[test]
    fn test_pooled_moments() {
        let data = Dataset::new(
            labels(&["x", "x", "y", "y"]),
            vec![1.0, 2.0, 3.0, 4.0],
        )
        .unwrap();

        assert!((data.pooled_mean() - 2.5).abs() < 1e-12);
        // Sample sd of 1,2,3,4 is sqrt(5/3).
        assert!((data.pooled_sd() - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_pooled_sd_floor_for_constant_data() {
        let data = Dataset::new(
            labels(&["x", "x", "y", "y"]),
            vec![7.0, 7.0, 7.0, 7.0],
        )
        .unwrap();

        assert!(data.pooled_sd() > 0.0);
    }
}
