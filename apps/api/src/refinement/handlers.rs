//! Axum route handlers for the stateless Refinement API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::refinement::RefinementResult;
use crate::state::AppState;

/// No local validation: empty inputs go to the model as-is.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// POST /api/v1/refine
pub async fn handle_refine(
    State(state): State<AppState>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<RefinementResult>, AppError> {
    let result = state
        .refiner
        .refine(&request.system_prompt, &request.user_prompt)
        .await?;
    Ok(Json(result))
}
