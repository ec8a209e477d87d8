pub mod provider;
pub mod claude;
pub mod gemini;
pub mod prompts;
pub mod parser;

pub use provider::RoastGenerator;
pub use claude::ClaudeProvider;
pub use gemini::GeminiProvider;
pub use prompts::RoastPrompt;
