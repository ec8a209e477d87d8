use async_trait::async_trait;
use crate::error::Result;
use crate::llm::prompts::RoastPrompt;
use crate::models::GeneratedRoasts;

#[async_trait]
pub trait RoastGenerator: Send + Sync {
    async fn generate_roasts(&self, prompt: &RoastPrompt) -> Result<GeneratedRoasts>;
    fn name(&self) -> &str;
}
