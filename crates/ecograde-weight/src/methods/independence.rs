use rayon::prelude::*;

use crate::config::{IndependenceConfig, WeightingMethodKind};
use crate::error::WeightError;
use crate::linalg::r_squared;
use crate::traits::WeightingMethod;
use crate::types::{SampleMatrix, normalize_or_equal};

const INDEPENDENCE_EPSILON: f64 = 1e-10;

/// Regression-independence weighting, optionally within contiguous blocks.
#[derive(Debug, Clone, Default)]
pub struct IndependenceMethod {
    blocks: Vec<usize>,
}

impl IndependenceMethod {
    pub fn new(config: IndependenceConfig) -> Result<Self, WeightError> {
        if config.blocks.contains(&0) {
            return Err(WeightError::InvalidParameter(
                "independence blocks must be non-empty".to_string(),
            ));
        }
        Ok(Self {
            blocks: config.blocks,
        })
    }
}

impl WeightingMethod for IndependenceMethod {
    fn name(&self) -> &'static str {
        "independence"
    }

    fn kind(&self) -> WeightingMethodKind {
        WeightingMethodKind::Independence
    }

    fn compute(&self, samples: &SampleMatrix) -> Result<Vec<f64>, WeightError> {
        if self.blocks.is_empty() {
            independence_weights(samples)
        } else {
            blocked_independence_weights(samples, &self.blocks)
        }
    }
}

/// Regresses every column on the others (OLS with intercept) and weights by
/// `1 / (R_j + eps)`. Degenerate fits count as fully dependent (`R_j = 1`).
pub fn independence_weights(samples: &SampleMatrix) -> Result<Vec<f64>, WeightError> {
    samples.require_rows("independence", 2)?;
    let columns: Vec<&[f64]> = samples.iter_columns().collect();
    if columns.len() < 2 {
        return Ok(vec![1.0; columns.len()]);
    }

    let inverse = (0..columns.len())
        .into_par_iter()
        .map(|j| {
            let regressors: Vec<&[f64]> = columns
                .iter()
                .enumerate()
                .filter(|(k, _)| *k != j)
                .map(|(_, c)| *c)
                .collect();
            let r2 = columns
                .get(j)
                .and_then(|y| r_squared(y, &regressors))
                .unwrap_or_else(|| {
                    tracing::warn!(indicator = j, "degenerate regression, treating as fully dependent");
                    1.0
                });
            1.0 / (r2.max(0.0).sqrt() + INDEPENDENCE_EPSILON)
        })
        .collect();
    Ok(normalize_or_equal(inverse, "independence"))
}

/// Independence weights computed inside each contiguous block, each block
/// rescaled by `block_size / total_columns` and concatenated.
pub fn blocked_independence_weights(
    samples: &SampleMatrix,
    blocks: &[usize],
) -> Result<Vec<f64>, WeightError> {
    let total = samples.columns();
    if blocks.is_empty() {
        return independence_weights(samples);
    }
    if blocks.contains(&0) || blocks.iter().sum::<usize>() != total {
        return Err(WeightError::InvalidParameter(format!(
            "block sizes {blocks:?} do not partition {total} columns"
        )));
    }
    samples.require_rows("independence", 2)?;

    let mut out = Vec::with_capacity(total);
    let mut start = 0;
    for &size in blocks {
        let inner = if size == 1 {
            vec![1.0]
        } else {
            independence_weights(&samples.select_columns(start, size)?)?
        };
        #[allow(clippy::cast_precision_loss)]
        let share = size as f64 / total as f64;
        out.extend(inner.into_iter().map(|w| w * share));
        start += size;
    }
    Ok(out)
}
