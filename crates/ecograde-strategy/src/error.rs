use ecograde_sort::SortError;
use ecograde_weight::WeightError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("unknown subsystem: {0}")]
    UnknownSubsystem(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid strategy: {0}")]
    Invalid(#[from] SortError),

    /// The caller's indicator vector does not fit the subsystem table.
    #[error("rejected {subsystem} observation: {source}")]
    Observation {
        subsystem: String,
        #[source]
        source: SortError,
    },

    #[error("weighting failed: {0}")]
    Weight(#[from] WeightError),
}
