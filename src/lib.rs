pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod llm;
pub mod analysis;
pub mod roast;
pub mod storage;
pub mod server;

pub use config::{Config, PipelineConfig, ProviderKind};
pub use error::{Error, Result};
pub use github::{GitHubClient, ResponseCache};
pub use llm::{ClaudeProvider, GeminiProvider, RoastGenerator};
pub use analysis::{analyze, ActivityAnalyzer, RoastPipeline};
pub use roast::RoastService;
pub use storage::Storage;
