mod critic;
mod entropy;
mod independence;
mod principal;
mod variation;

pub use critic::{CriticMethod, critic_weights};
pub use entropy::{EntropyMethod, entropy_weights};
pub use independence::{IndependenceMethod, blocked_independence_weights, independence_weights};
pub use principal::{PrincipalComponentMethod, principal_component_weights};
pub use variation::{VariationMethod, variation_weights};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::types::SampleMatrix;

    pub fn matrix(rows: &[&[f64]]) -> SampleMatrix {
        SampleMatrix::new(rows.iter().map(|r| r.to_vec()).collect())
            .unwrap_or_else(|e| panic!("matrix: {e}"))
    }

    pub fn assert_simplex(weights: &[f64]) {
        let total: f64 = weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-9, "sum {total} in {weights:?}");
        assert!(weights.iter().all(|w| *w >= 0.0), "negative weight in {weights:?}");
    }
}
