use ecograde_sort::{EvaluationConfig, SortError, normalize};
use ecograde_weight::{FusionConfig, SampleMatrix, WeightReport, derive_weights};
use serde::{Deserialize, Serialize};

use crate::error::StrategyError;

/// One historical observation kept next to a subsystem table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSample {
    pub label: String,
    pub values: Vec<f64>,
}

/// Grading table of one subsystem plus the observations its weights were
/// derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsystemStrategy {
    #[serde(flatten)]
    pub config: EvaluationConfig,
    #[serde(default)]
    pub samples: Vec<HistoricalSample>,
}

impl SubsystemStrategy {
    pub fn new(config: EvaluationConfig) -> Self {
        Self {
            config,
            samples: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, StrategyError> {
        let strategy: Self = serde_json::from_str(json)?;
        strategy.config.validate()?;
        Ok(strategy)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Historical samples, direction-unified and scaled into `[0, 1]`
    /// against each indicator's boundary range.
    pub fn sample_matrix(&self) -> Result<SampleMatrix, StrategyError> {
        let n = self.config.indicator_count();
        let rows = self
            .samples
            .iter()
            .map(|sample| {
                if sample.values.len() != n {
                    return Err(StrategyError::Invalid(SortError::DimensionMismatch {
                        expected: n,
                        actual: sample.values.len(),
                    }));
                }
                Ok(sample
                    .values
                    .iter()
                    .zip(&self.config.transforms)
                    .zip(&self.config.boundaries)
                    .map(|((&v, t), row)| {
                        let min = row.first().copied().unwrap_or_default();
                        let max = row.last().copied().unwrap_or_default();
                        normalize(t.apply(v), min, max)
                    })
                    .collect())
            })
            .collect::<Result<Vec<Vec<f64>>, StrategyError>>()?;
        Ok(SampleMatrix::new(rows)?)
    }

    /// Re-derives the indicator weights from the historical samples. Groups
    /// that tile the indicators contiguously become the independence blocks.
    pub fn derive_weights(&self, fusion: &FusionConfig) -> Result<WeightReport, StrategyError> {
        let samples = self.sample_matrix()?;
        let blocks = self.config.contiguous_group_sizes().unwrap_or_default();
        Ok(derive_weights(&samples, &blocks, fusion)?)
    }
}
