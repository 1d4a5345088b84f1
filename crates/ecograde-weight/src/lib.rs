pub mod config;
pub mod error;
pub mod factory;
pub mod fusion;
mod linalg;
pub mod methods;
pub mod pipeline;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::WeightError;
pub use factory::*;
pub use fusion::*;
pub use methods::*;
pub use pipeline::*;
pub use traits::*;
pub use types::*;
