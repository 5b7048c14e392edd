//! Text-generation side of the pipeline
//!
//! - [`prompt`]: renders the persona prompt
//! - [`openai`]: completion backend client
//! - [`parser`]: strict decoding of the model output into [`crate::ForecastResult`]

use async_trait::async_trait;

use crate::Result;

pub mod openai;
pub mod parser;
pub mod prompt;

pub use openai::OpenAiClient;
pub use parser::{ResponseParser, format_instructions};
pub use prompt::{PromptComposer, PromptTemplate};

/// Backend that turns a prompt into raw completion text
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns [`crate::SidekickError::Completion`] on authentication,
    /// quota, backend, or network failure.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
