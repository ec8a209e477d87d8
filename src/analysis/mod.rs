pub mod analyzer;
pub mod emoji;
pub mod patterns;
pub mod pipeline;

pub use analyzer::{analyze, ActivityAnalyzer};
pub use pipeline::RoastPipeline;
