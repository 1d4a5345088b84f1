use crate::config::WeightingMethodKind;
use crate::error::WeightError;
use crate::linalg::{correlation_matrix, population_std};
use crate::traits::WeightingMethod;
use crate::types::{SampleMatrix, normalize_or_equal};

/// Dispersion-conflict (CRITIC) weighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticMethod;

impl WeightingMethod for CriticMethod {
    fn name(&self) -> &'static str {
        "critic"
    }

    fn kind(&self) -> WeightingMethodKind {
        WeightingMethodKind::Critic
    }

    fn compute(&self, samples: &SampleMatrix) -> Result<Vec<f64>, WeightError> {
        critic_weights(samples)
    }
}

/// Information content `sigma_j * sum_k (1 - r_jk)`, normalised.
///
/// A constant column correlates 0 with every column, itself included.
pub fn critic_weights(samples: &SampleMatrix) -> Result<Vec<f64>, WeightError> {
    samples.require_rows("critic", 2)?;
    samples.require_columns("critic", 2)?;
    let columns: Vec<&[f64]> = samples.iter_columns().collect();
    let corr = correlation_matrix(&columns, false)
        .ok_or_else(|| WeightError::InvalidShape("critic: ragged sample columns".to_string()))?;

    let info = columns
        .iter()
        .zip(&corr)
        .map(|(column, row)| {
            let conflict: f64 = row.iter().map(|r| 1.0 - r).sum();
            population_std(column) * conflict
        })
        .collect();
    Ok(normalize_or_equal(info, "critic"))
}
