use crate::config::WeightingMethodKind;
use crate::error::WeightError;
use crate::linalg::{mean, population_std};
use crate::traits::WeightingMethod;
use crate::types::{SampleMatrix, normalize_or_equal};

const MEAN_EPSILON: f64 = 1e-9;

/// Coefficient-of-variation weighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariationMethod;

impl WeightingMethod for VariationMethod {
    fn name(&self) -> &'static str {
        "coefficient_of_variation"
    }

    fn kind(&self) -> WeightingMethodKind {
        WeightingMethodKind::CoefficientOfVariation
    }

    fn compute(&self, samples: &SampleMatrix) -> Result<Vec<f64>, WeightError> {
        variation_weights(samples)
    }
}

/// `sigma_j / |mu_j|` per column, normalised. Columns with a near-zero mean
/// contribute nothing.
pub fn variation_weights(samples: &SampleMatrix) -> Result<Vec<f64>, WeightError> {
    samples.require_rows("coefficient_of_variation", 2)?;
    samples.require_columns("coefficient_of_variation", 2)?;
    let cv = samples
        .iter_columns()
        .enumerate()
        .map(|(j, column)| {
            let mu = mean(column).abs();
            if mu < MEAN_EPSILON {
                tracing::warn!(
                    indicator = j,
                    mean = mu,
                    "near-zero mean, coefficient of variation set to 0"
                );
                return 0.0;
            }
            population_std(column) / mu
        })
        .collect();
    Ok(normalize_or_equal(cv, "coefficient_of_variation"))
}
