use crate::config::WeightingMethodKind;
use crate::error::WeightError;
use crate::types::SampleMatrix;

/// One objective weighting method over a sample × indicator matrix.
///
/// Implementations return one non-negative weight per column, summing to 1,
/// in column order.
pub trait WeightingMethod: Send + Sync {
    fn name(&self) -> &'static str;

    fn kind(&self) -> WeightingMethodKind;

    fn compute(&self, samples: &SampleMatrix) -> Result<Vec<f64>, WeightError>;
}
