//! Axum route handlers for the HTML pages.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::views::page::render_page;

#[derive(Debug, Deserialize)]
pub struct RefineForm {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// GET /
///
/// Every visit opens a fresh session pre-filled with the default prompts.
pub async fn handle_index(State(state): State<AppState>) -> Redirect {
    let controller = state.sessions.create().await;
    Redirect::to(&format!("/sessions/{}", controller.id()))
}

/// GET /sessions/:id
///
/// Unknown sessions (e.g. after a restart) start over at `/`.
pub async fn handle_session_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.sessions.get(id).await {
        Ok(controller) => {
            let snapshot = controller.snapshot().await;
            Html(render_page(snapshot.id, &snapshot.state)).into_response()
        }
        Err(_) => Redirect::to("/").into_response(),
    }
}

/// POST /sessions/:id/refine
///
/// Stores the submitted inputs, starts the refinement and redirects back to the
/// page at once. The page shows Loading and refreshes until the attempt lands.
pub async fn handle_session_refine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<RefineForm>,
) -> Result<Redirect, AppError> {
    let controller = state.sessions.get(id).await?;
    controller
        .edit(Some(form.system_prompt), Some(form.user_prompt))
        .await;

    match controller.trigger_refine_detached().await {
        Ok(()) => debug!(session = %id, "Refinement started"),
        // A resubmitted form while loading just shows the page again.
        Err(AppError::Conflict(_)) => debug!(session = %id, "Refinement already in progress"),
        Err(e) => return Err(e),
    }

    Ok(Redirect::to(&format!("/sessions/{id}")))
}
