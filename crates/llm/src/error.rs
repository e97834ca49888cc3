/// Errors from the text-generation layer.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Model API error ({status}): {body}")]
    Api {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider answered without any content.
    #[error("Model returned an empty completion")]
    EmptyResponse,

    /// The response body could not be interpreted.
    #[error("Failed to decode model response: {0}")]
    Decode(String),

    /// Missing or malformed configuration.
    #[error("Invalid LLM configuration: {0}")]
    Config(String),
}
