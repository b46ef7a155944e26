use serde::{Deserialize, Serialize};

pub mod gemini;

pub use gemini::GeminiClient;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("missing provider api key: env var `{env}` is unset or empty")]
    MissingApiKey { env: String },
    #[error("provider request failed: {0}")]
    Transport(String),
    #[error("provider responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider response decode failed: {0}")]
    Decode(String),
    #[error("provider returned no candidates for model `{model}`")]
    EmptyResponse { model: String },
}

/// One model invocation: the role's instruction as the system contract plus
/// the rendered session context as the user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub system_instruction: String,
    pub user_content: String,
    /// Declares the provider-side web search tool for this call. Only the
    /// searcher role sets it.
    pub enable_web_search: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerateResult {
    pub text: String,
}
