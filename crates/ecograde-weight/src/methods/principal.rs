use crate::config::{PrincipalComponentConfig, WeightingMethodKind};
use crate::error::WeightError;
use crate::linalg::{correlation_matrix, symmetric_eigen};
use crate::traits::WeightingMethod;
use crate::types::{SampleMatrix, normalize_or_equal};

/// Principal-component weighting over the correlation matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrincipalComponentMethod {
    config: PrincipalComponentConfig,
}

impl PrincipalComponentMethod {
    pub fn new(config: PrincipalComponentConfig) -> Result<Self, WeightError> {
        let t = config.cumulative_threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(WeightError::InvalidParameter(format!(
                "cumulative contribution threshold must lie in (0, 1], got {t}"
            )));
        }
        Ok(Self { config })
    }
}

impl WeightingMethod for PrincipalComponentMethod {
    fn name(&self) -> &'static str {
        "principal_component"
    }

    fn kind(&self) -> WeightingMethodKind {
        WeightingMethodKind::PrincipalComponent
    }

    fn compute(&self, samples: &SampleMatrix) -> Result<Vec<f64>, WeightError> {
        principal_component_weights(samples, self.config.cumulative_threshold)
    }
}

/// Loadings of the leading components, weighted by their contribution rates.
///
/// Components are taken in descending eigenvalue order until the cumulative
/// contribution reaches `cumulative_threshold`.
pub fn principal_component_weights(
    samples: &SampleMatrix,
    cumulative_threshold: f64,
) -> Result<Vec<f64>, WeightError> {
    samples.require_rows("principal_component", 2)?;
    let columns: Vec<&[f64]> = samples.iter_columns().collect();
    let n = columns.len();
    let (values, vectors) = correlation_matrix(&columns, true)
        .and_then(|corr| symmetric_eigen(&corr))
        .ok_or_else(|| {
            WeightError::InvalidShape("principal_component: ragged sample columns".to_string())
        })?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&x, &y| {
        let vx = values.get(x).copied().unwrap_or_default();
        let vy = values.get(y).copied().unwrap_or_default();
        vy.total_cmp(&vx)
    });

    let total: f64 = values.iter().sum();
    let rates: Vec<f64> = order
        .iter()
        .map(|&k| values.get(k).copied().unwrap_or_default() / total)
        .collect();

    let mut cumulative = 0.0;
    let mut selected = n;
    for (i, rate) in rates.iter().enumerate() {
        cumulative += rate;
        if cumulative >= cumulative_threshold {
            selected = i + 1;
            break;
        }
    }
    tracing::debug!(components = selected, cumulative, "principal components selected");

    let scores = vectors
        .iter()
        .map(|row| {
            order
                .iter()
                .zip(&rates)
                .take(selected)
                .map(|(&k, rate)| rate * row.get(k).copied().unwrap_or_default().abs())
                .sum()
        })
        .collect();
    Ok(normalize_or_equal(scores, "principal_component"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::test_support::{assert_simplex, matrix};

    #[test]
    fn exchangeable_columns_get_equal_weight() {
        let m = matrix(&[&[1.0, 2.0], &[2.0, 1.0], &[3.0, 4.0], &[4.0, 3.0]]);
        let w = principal_component_weights(&m, 0.85).unwrap_or_default();
        assert_simplex(&w);
        assert!((w[0] - w[1]).abs() < 1e-9);
    }

    #[test]
    fn weights_stay_on_simplex_with_constant_column() {
        let m = matrix(&[
            &[0.1, 5.0, 0.3],
            &[0.4, 5.0, 0.1],
            &[0.2, 5.0, 0.9],
            &[0.8, 5.0, 0.5],
        ]);
        assert_simplex(&principal_component_weights(&m, 0.85).unwrap_or_default());
    }

    #[test]
    fn threshold_is_validated() {
        let bad = PrincipalComponentConfig {
            cumulative_threshold: 0.0,
        };
        assert!(PrincipalComponentMethod::new(bad).is_err());
        assert!(PrincipalComponentMethod::new(PrincipalComponentConfig::new()).is_ok());
    }
}
