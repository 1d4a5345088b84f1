pub mod builtin;
pub mod error;
pub mod registry;
pub mod types;

pub use builtin::*;
pub use error::StrategyError;
pub use registry::*;
pub use types::*;
