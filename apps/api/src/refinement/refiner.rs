//! Refinement Client — the `Refiner` seam and its Gemini-backed implementation.
//!
//! `AppState` holds an `Arc<dyn Refiner>`; tests swap in fakes.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::llm_client::GeminiClient;
use crate::refinement::contract::{parse_payload, response_schema, RefinementResult};
use crate::refinement::prompts::{build_refine_prompt, REFINE_SYSTEM};
use crate::refinement::RefineError;

/// Turns a system/user prompt pair into a `RefinementResult`.
///
/// One invocation is one external attempt: no caching, no retries, and no guard
/// against being called again while a previous call is still running.
#[async_trait]
pub trait Refiner: Send + Sync {
    async fn refine(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<RefinementResult, RefineError>;
}

/// Default `Refiner`: one schema-guided `generateContent` call per refinement.
pub struct GeminiRefiner {
    llm: GeminiClient,
    instruction: String,
    schema: Value,
}

impl GeminiRefiner {
    pub fn new(llm: GeminiClient) -> Self {
        Self::with_instruction(llm, REFINE_SYSTEM.to_string())
    }

    /// Uses a custom system instruction. The response schema stays fixed.
    pub fn with_instruction(llm: GeminiClient, instruction: String) -> Self {
        Self {
            llm,
            instruction,
            schema: response_schema(),
        }
    }
}

#[async_trait]
impl Refiner for GeminiRefiner {
    async fn refine(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<RefinementResult, RefineError> {
        let prompt = build_refine_prompt(system_prompt, user_prompt);
        debug!(
            system_chars = system_prompt.len(),
            user_chars = user_prompt.len(),
            "Requesting refinement"
        );

        let payload = self
            .llm
            .generate_text(&prompt, &self.instruction, &self.schema)
            .await?;

        let result = parse_payload(&payload)?;
        info!(
            inaccuracies = result.inaccuracies.len(),
            "Refinement parsed"
        );
        Ok(result)
    }
}
