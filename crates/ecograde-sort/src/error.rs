use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SortError {
    #[error("invalid evaluation config: {0}")]
    InvalidConfig(String),

    #[error("indicator vector has {actual} values, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("non-finite value for indicator {index}")]
    NonFiniteValue { index: usize },

    #[error("unknown criterion group: {0}")]
    UnknownGroup(String),
}
