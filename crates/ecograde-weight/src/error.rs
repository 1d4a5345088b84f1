use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WeightError {
    #[error("invalid sample shape: {0}")]
    InvalidShape(String),

    #[error("non-finite sample value at row {row}, column {column}")]
    NonFinite { row: usize, column: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("fusion expects {expected} weight vectors, got {actual}")]
    MethodCount { expected: usize, actual: usize },
}
