use crate::{error::Result, gemini::prompt::Prompt};
use async_trait::async_trait;

/// A generative backend that turns a prompt into raw response text.
///
/// Implementations issue exactly one call per `complete` and must not retry.
#[async_trait]
pub trait PaletteProvider: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String>;

    fn model(&self) -> &str;
}
