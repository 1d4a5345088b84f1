use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PCA_CUMULATIVE, FusionConfig};
use crate::error::WeightError;
use crate::fusion::fuse_weights;
use crate::methods::{
    blocked_independence_weights, critic_weights, entropy_weights, principal_component_weights,
    variation_weights,
};
use crate::types::SampleMatrix;

/// Every intermediate estimate of one weighting run plus the fused result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightReport {
    pub independence: Vec<f64>,
    pub entropy: Vec<f64>,
    pub principal_component: Vec<f64>,
    pub critic: Vec<f64>,
    pub variation: Vec<f64>,
    pub fused: Vec<f64>,
}

impl WeightReport {
    /// The five estimates in fusion row order.
    pub fn estimates(&self) -> [&[f64]; 5] {
        [
            &self.independence,
            &self.entropy,
            &self.principal_component,
            &self.critic,
            &self.variation,
        ]
    }
}

/// Runs blocked independence, entropy, principal component, CRITIC and
/// coefficient of variation over `samples`, then fuses them with OWA.
///
/// Empty `blocks` means a single block spanning every column.
pub fn derive_weights(
    samples: &SampleMatrix,
    blocks: &[usize],
    fusion: &FusionConfig,
) -> Result<WeightReport, WeightError> {
    fusion.validate()?;
    let independence = blocked_independence_weights(samples, blocks)?;
    let entropy = entropy_weights(samples);
    let principal_component = principal_component_weights(samples, DEFAULT_PCA_CUMULATIVE)?;
    let critic = critic_weights(samples)?;
    let variation = variation_weights(samples)?;

    let rows = vec![
        independence.clone(),
        entropy.clone(),
        principal_component.clone(),
        critic.clone(),
        variation.clone(),
    ];
    let fused = fuse_weights(&rows, fusion)?;
    tracing::debug!(indicators = fused.len(), a = fusion.a, b = fusion.b, "weights derived");

    Ok(WeightReport {
        independence,
        entropy,
        principal_component,
        critic,
        variation,
        fused,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::test_support::{assert_simplex, matrix};

    #[test]
    fn report_vectors_are_all_simplex() {
        let m = matrix(&[
            &[0.40, 0.53, 0.92, 0.48],
            &[0.70, 0.60, 0.89, 0.58],
            &[0.45, 0.69, 0.93, 0.43],
            &[0.65, 0.58, 0.95, 0.66],
            &[0.60, 0.76, 0.97, 0.61],
        ]);
        let report = derive_weights(&m, &[2, 2], &FusionConfig::default())
            .unwrap_or_else(|e| panic!("derive: {e}"));
        for estimate in report.estimates() {
            assert_eq!(estimate.len(), 4);
            assert_simplex(estimate);
        }
        assert_simplex(&report.fused);
    }

    #[test]
    fn bad_blocks_propagate() {
        let m = matrix(&[&[0.1, 0.2], &[0.3, 0.1], &[0.2, 0.5]]);
        assert!(derive_weights(&m, &[3], &FusionConfig::default()).is_err());
    }
}
