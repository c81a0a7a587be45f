//! Refinement: sends a system/user prompt pair to the model and parses the
//! returned Response Contract.

pub mod contract;
pub mod handlers;
pub mod prompts;
pub mod refiner;

use thiserror::Error;

use crate::llm_client::LlmError;

pub use contract::RefinementResult;
pub use refiner::{GeminiRefiner, Refiner};

/// Why a refinement attempt failed. The `Display` text is what the user sees.
#[derive(Debug, Error)]
pub enum RefineError {
    #[error("No response from Gemini")]
    EmptyResponse,

    #[error("Failed to parse refinement response: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    /// Transport, credential or quota failure, carried with the service's message.
    #[error("{0}")]
    Service(String),
}

impl From<LlmError> for RefineError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyContent => RefineError::EmptyResponse,
            LlmError::Api { status, message } => {
                tracing::warn!(status, "Gemini API rejected the request");
                RefineError::Service(message)
            }
            other => RefineError::Service(other.to_string()),
        }
    }
}
