use serde::{Deserialize, Serialize};

use crate::error::WeightError;

/// Sample × indicator matrix, stored column by column.
///
/// Rows are observations (years, sites), columns are indicators. Every value
/// is finite and every row has the same width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct SampleMatrix {
    rows: usize,
    columns: Vec<Vec<f64>>,
}

impl SampleMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, WeightError> {
        let width = rows
            .first()
            .map(Vec::len)
            .ok_or_else(|| WeightError::InvalidShape("sample matrix has no rows".to_string()))?;
        if width == 0 {
            return Err(WeightError::InvalidShape(
                "sample matrix has no columns".to_string(),
            ));
        }

        let mut columns = vec![Vec::with_capacity(rows.len()); width];
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(WeightError::InvalidShape(format!(
                    "row {i} has {} values, expected {width}",
                    row.len()
                )));
            }
            for (j, (&value, column)) in row.iter().zip(columns.iter_mut()).enumerate() {
                if !value.is_finite() {
                    return Err(WeightError::NonFinite { row: i, column: j });
                }
                column.push(value);
            }
        }

        Ok(Self {
            rows: rows.len(),
            columns,
        })
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, index: usize) -> Option<&[f64]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    pub fn iter_columns(&self) -> impl ExactSizeIterator<Item = &[f64]> {
        self.columns.iter().map(Vec::as_slice)
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows)
            .map(|i| {
                self.columns
                    .iter()
                    .map(|c| c.get(i).copied().unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    /// Contiguous column range `[start, start + len)` as its own matrix.
    pub fn select_columns(&self, start: usize, len: usize) -> Result<Self, WeightError> {
        let columns = self
            .columns
            .get(start..start + len)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                WeightError::InvalidShape(format!(
                    "column range {start}..{} outside {} columns",
                    start + len,
                    self.columns.len()
                ))
            })?;
        Ok(Self {
            rows: self.rows,
            columns: columns.to_vec(),
        })
    }

    /// Column-wise min-max rescale into `[0, 1]`; constant columns map to 0.
    #[must_use]
    pub fn min_max_normalized(&self) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|column| {
                let min = column.iter().copied().fold(f64::INFINITY, f64::min);
                let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let range = max - min;
                column
                    .iter()
                    .map(|&v| if range > 0.0 { (v - min) / range } else { 0.0 })
                    .collect()
            })
            .collect();
        Self {
            rows: self.rows,
            columns,
        }
    }

    pub(crate) fn require_rows(&self, method: &str, min: usize) -> Result<(), WeightError> {
        if self.rows < min {
            return Err(WeightError::InvalidShape(format!(
                "{method} needs at least {min} samples, got {}",
                self.rows
            )));
        }
        Ok(())
    }

    pub(crate) fn require_columns(&self, method: &str, min: usize) -> Result<(), WeightError> {
        if self.columns.len() < min {
            return Err(WeightError::InvalidShape(format!(
                "{method} needs at least {min} indicators, got {}",
                self.columns.len()
            )));
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<f64>>> for SampleMatrix {
    type Error = WeightError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<SampleMatrix> for Vec<Vec<f64>> {
    fn from(matrix: SampleMatrix) -> Self {
        matrix.to_rows()
    }
}

pub fn equal_weights(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let share = 1.0 / n as f64;
    vec![share; n]
}

/// Scales `scores` to sum 1. A zero or non-finite total falls back to equal
/// weights with a warning naming `method`.
pub fn normalize_or_equal(scores: Vec<f64>, method: &str) -> Vec<f64> {
    let total: f64 = scores.iter().sum();
    if total > 0.0 && total.is_finite() {
        return scores.into_iter().map(|s| s / total).collect();
    }
    tracing::warn!(method, total, "degenerate weight total, using equal weights");
    equal_weights(scores.len())
}
