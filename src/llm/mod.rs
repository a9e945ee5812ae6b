pub mod models;
pub mod ollama;

use async_trait::async_trait;
use thiserror::Error;

use models::Generation;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network Error: {0}")]
    Network(String),
    #[error("Inference server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// One-shot, non-streaming text generation against a model server.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<Generation, LlmError>;
}
