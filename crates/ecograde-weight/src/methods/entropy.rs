use crate::config::WeightingMethodKind;
use crate::error::WeightError;
use crate::traits::WeightingMethod;
use crate::types::{SampleMatrix, equal_weights, normalize_or_equal};

const COLUMN_SUM_EPSILON: f64 = 1e-12;

/// Shannon-entropy weighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropyMethod;

impl WeightingMethod for EntropyMethod {
    fn name(&self) -> &'static str {
        "entropy"
    }

    fn kind(&self) -> WeightingMethodKind {
        WeightingMethodKind::Entropy
    }

    fn compute(&self, samples: &SampleMatrix) -> Result<Vec<f64>, WeightError> {
        Ok(entropy_weights(samples))
    }
}

/// Divergence `1 - E_j` of each column's entropy, normalised.
///
/// Inputs are expected non-negative; negative values are logged and their
/// zero-or-negative shares skipped in the entropy sum.
#[allow(clippy::cast_precision_loss)]
pub fn entropy_weights(samples: &SampleMatrix) -> Vec<f64> {
    let m = samples.rows();
    let n = samples.columns();
    if m <= 1 {
        tracing::warn!(samples = m, "entropy needs at least two samples, using equal weights");
        return equal_weights(n);
    }

    let k = 1.0 / (m as f64).ln();
    let divergence = samples
        .iter_columns()
        .enumerate()
        .map(|(j, column)| {
            if let Some(v) = column.iter().find(|v| **v < 0.0) {
                tracing::warn!(indicator = j, value = *v, "negative input to entropy weighting");
            }
            let total: f64 = column.iter().sum::<f64>() + COLUMN_SUM_EPSILON;
            let h: f64 = column
                .iter()
                .map(|x| x / total)
                .filter(|p| *p > 0.0)
                .map(|p| p * p.ln())
                .sum();
            1.0 - (-k * h).clamp(0.0, 1.0)
        })
        .collect();
    normalize_or_equal(divergence, "entropy")
}
