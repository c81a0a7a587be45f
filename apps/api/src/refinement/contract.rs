//! Response Contract — the three-field shape the model must return.
//!
//! Declared once: `RefinementResult` types the parsed payload, and
//! `response_schema()` is the same shape in Gemini's schema dialect, sent with
//! every call to constrain generation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::llm_client::strip_json_fences;
use crate::refinement::RefineError;

/// A completed refinement. Immutable once parsed; replaces any prior result whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RefinementResult {
    pub concise_system_prompt: String,
    pub inaccuracies: Vec<String>,
    pub refined_user_prompt: String,
}

/// Gemini `responseSchema` for `RefinementResult`. All three fields are required.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "conciseSystemPrompt": {
                "type": "STRING",
                "description": "A more concise and effective version of the system template instructions."
            },
            "inaccuracies": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of shortcomings or inaccuracies found in the user prompt."
            },
            "refinedUserPrompt": {
                "type": "STRING",
                "description": "The improved user prompt following the new structural requirements."
            }
        },
        "required": ["conciseSystemPrompt", "inaccuracies", "refinedUserPrompt"]
    })
}

/// Parses the structured payload returned by the model.
///
/// Blank payloads are `EmptyResponse`; anything that is not a JSON object with
/// exactly the contract's fields is `MalformedPayload`.
pub fn parse_payload(payload: &str) -> Result<RefinementResult, RefineError> {
    let text = strip_json_fences(payload);
    if text.is_empty() {
        return Err(RefineError::EmptyResponse);
    }
    serde_json::from_str(text).map_err(RefineError::MalformedPayload)
}
