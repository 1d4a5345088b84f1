pub mod ffn;
pub mod grade;

pub use ffn::*;
pub use grade::*;
