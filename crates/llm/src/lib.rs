//! Text generation for the article pipeline.
//!
//! - [`TextGenerator`]: the seam the pipeline calls; tests plug in fakes.
//! - [`OpenAiClient`]: implementation over an OpenAI-compatible
//!   `/chat/completions` endpoint.
//! - [`LlmConfig`]: endpoint, credentials and sampling defaults.

pub mod client;
pub mod config;
pub mod error;
pub mod request;

use async_trait::async_trait;

pub use client::OpenAiClient;
pub use config::LlmConfig;
pub use error::LlmError;
pub use request::{CompletionRequest, Message, Role};

/// Produces text for a completion request.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate the assistant reply for `request`.
    ///
    /// An empty reply is reported as [`LlmError::EmptyResponse`].
    async fn generate(&self, request: &CompletionRequest) -> Result<String, LlmError>;

    /// Name of the model used, for logging.
    fn model_name(&self) -> &str;
}
