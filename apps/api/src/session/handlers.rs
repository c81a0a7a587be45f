//! Axum route handlers for the Session API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::{RefineOutcome, SessionSnapshot};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    pub system_prompt: Option<String>,
    pub user_prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefineSessionResponse {
    pub outcome: RefineOutcome,
    pub session: SessionSnapshot,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let controller = state.sessions.create().await;
    (StatusCode::CREATED, Json(controller.snapshot().await))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let controller = state.sessions.get(id).await?;
    Ok(Json(controller.snapshot().await))
}

/// PATCH /api/v1/sessions/:id
///
/// Edits either input. Allowed while a refinement is loading.
pub async fn handle_edit_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EditRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let controller = state.sessions.get(id).await?;
    controller.edit(req.system_prompt, req.user_prompt).await;
    Ok(Json(controller.snapshot().await))
}

/// POST /api/v1/sessions/:id/refine
///
/// Runs one refinement with the session's current inputs. A failed attempt is
/// still a 200: the failure lives in the session's `error` field.
pub async fn handle_refine_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RefineSessionResponse>, AppError> {
    let controller = state.sessions.get(id).await?;
    let outcome = controller.trigger_refine().await?;
    Ok(Json(RefineSessionResponse {
        outcome,
        session: controller.snapshot().await,
    }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
