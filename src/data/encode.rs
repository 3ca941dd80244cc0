//! Group label encoding.
//!
//! Distinct group labels are assigned dense integer indices used as array
//! offsets into per-group parameter vectors. Assignment is alphabetical,
//! which makes it stable within a run and reproducible across runs over
//! the same label set.

use std::collections::BTreeMap;

/// Maps group labels to dense integer indices.
///
/// Indices are assigned in sorted label order starting at 0. Encoding the
/// same label always yields the same index for the lifetime of the
/// encoder, and fitting the same label set again yields the same
/// assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEncoder {
    index_by_label: BTreeMap<String, usize>,
    labels: Vec<String>,
}

impl GroupEncoder {
    /// Fit an encoder over the labels seen in an iterator.
    ///
    /// Duplicates are collapsed; order of appearance does not matter.
    pub fn fit<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut sorted: Vec<String> = labels.into_iter().map(str::to_string).collect();
        sorted.sort();
        sorted.dedup();

        let index_by_label = sorted
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();

        Self {
            index_by_label,
            labels: sorted,
        }
    }

    /// Dense index for a label, or `None` if the label was not fitted.
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.index_by_label.get(label).copied()
    }

    /// Label for a dense index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn decode(&self, index: usize) -> &str {
        &self.labels[index]
    }

    /// All labels in encoding order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check whether the encoder is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
