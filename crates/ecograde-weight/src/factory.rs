use std::sync::Arc;

use crate::config::{WeightingMethodConfig, WeightingMethodKind};
use crate::error::WeightError;
use crate::methods::{
    CriticMethod, EntropyMethod, IndependenceMethod, PrincipalComponentMethod, VariationMethod,
};
use crate::traits::WeightingMethod;
use crate::types::SampleMatrix;

pub fn build_weighting_method(
    cfg: WeightingMethodConfig,
) -> Result<Arc<dyn WeightingMethod>, WeightError> {
    match cfg {
        WeightingMethodConfig::Critic => Ok(Arc::new(CriticMethod)),
        WeightingMethodConfig::Entropy => Ok(Arc::new(EntropyMethod)),
        WeightingMethodConfig::PrincipalComponent(c) => {
            Ok(Arc::new(PrincipalComponentMethod::new(c)?))
        }
        WeightingMethodConfig::Independence(c) => Ok(Arc::new(IndependenceMethod::new(c)?)),
        WeightingMethodConfig::CoefficientOfVariation => Ok(Arc::new(VariationMethod)),
    }
}

/// One base method with its default parameters.
pub fn compute_weights(
    samples: &SampleMatrix,
    method: WeightingMethodKind,
) -> Result<Vec<f64>, WeightError> {
    build_weighting_method(method.into())?.compute(samples)
}
