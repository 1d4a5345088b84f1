pub mod config;
pub mod engine;
pub mod error;
pub mod types;

pub use config::*;
pub use engine::*;
pub use error::SortError;
pub use types::*;
