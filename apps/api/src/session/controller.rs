//! Root Controller — owns one session's `PromptState` and drives refinement attempts.
//!
//! Each attempt runs on its own task so a dropped HTTP request cannot leave the
//! session stuck in Loading. The external call races the session's cancellation
//! token; closing the session drops the in-flight call and its late result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::refinement::Refiner;
use crate::session::state::PromptState;

/// What happened to one refinement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefineOutcome {
    Completed,
    Failed,
    /// A newer attempt was started; this result was dropped.
    Superseded,
    /// The session was closed while the call was in flight.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub state: PromptState,
}

/// Inputs captured when an attempt starts. Later edits do not affect it.
struct Attempt {
    seq: u64,
    system_prompt: String,
    user_prompt: String,
}

pub struct PromptController {
    id: Uuid,
    created_at: DateTime<Utc>,
    state: Mutex<PromptState>,
    refiner: Arc<dyn Refiner>,
    cancel: CancellationToken,
    latest_attempt: AtomicU64,
    last_seen: Mutex<Instant>,
}

impl PromptController {
    pub fn new(refiner: Arc<dyn Refiner>) -> Self {
        Self::with_state(refiner, PromptState::default())
    }

    pub fn with_state(refiner: Arc<dyn Refiner>, state: PromptState) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            state: Mutex::new(state),
            refiner,
            cancel: CancellationToken::new(),
            latest_attempt: AtomicU64::new(0),
            last_seen: Mutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Marks the session as in use now.
    pub async fn touch(&self) {
        *self.last_seen.lock().await = Instant::now();
    }

    pub async fn idle_for(&self) -> Duration {
        self.last_seen.lock().await.elapsed()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            created_at: self.created_at,
            state: self.state.lock().await.clone(),
        }
    }

    /// Replaces either input text. Never cancels or alters an attempt in flight.
    pub async fn edit(&self, system_prompt: Option<String>, user_prompt: Option<String>) {
        let mut state = self.state.lock().await;
        if let Some(text) = system_prompt {
            state.set_system_prompt(text);
        }
        if let Some(text) = user_prompt {
            state.set_user_prompt(text);
        }
    }

    /// The user-facing trigger: refuses to start while an attempt is loading,
    /// then waits for the attempt to finish.
    pub async fn trigger_refine(self: &Arc<Self>) -> Result<RefineOutcome, AppError> {
        let attempt = self.try_start().await?;
        self.spawn(attempt)
            .await
            .map_err(|e| AppError::Internal(anyhow!("refinement task failed: {e}")))
    }

    /// Same guard as `trigger_refine`, but returns as soon as the session is in
    /// Loading. The outcome lands in the session state.
    pub async fn trigger_refine_detached(self: &Arc<Self>) -> Result<(), AppError> {
        let attempt = self.try_start().await?;
        drop(self.spawn(attempt));
        Ok(())
    }

    /// Starts an attempt unconditionally, even if another is still loading.
    /// Only the most recently started attempt may write its outcome.
    #[cfg(test)]
    pub async fn refine(self: &Arc<Self>) -> Result<RefineOutcome, AppError> {
        let attempt = {
            let mut state = self.state.lock().await;
            self.start(&mut state)
        };
        self.spawn(attempt)
            .await
            .map_err(|e| AppError::Internal(anyhow!("refinement task failed: {e}")))
    }

    /// Cancels any in-flight call. Late results are discarded.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    async fn try_start(&self) -> Result<Attempt, AppError> {
        let mut state = self.state.lock().await;
        if state.loading {
            return Err(AppError::Conflict(
                "A refinement is already in progress".to_string(),
            ));
        }
        Ok(self.start(&mut state))
    }

    fn start(&self, state: &mut PromptState) -> Attempt {
        state.begin_refine();
        Attempt {
            seq: self.latest_attempt.fetch_add(1, Ordering::SeqCst) + 1,
            system_prompt: state.system_prompt.clone(),
            user_prompt: state.user_prompt.clone(),
        }
    }

    fn spawn(self: &Arc<Self>, attempt: Attempt) -> JoinHandle<RefineOutcome> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.run(attempt).await })
    }

    async fn run(&self, attempt: Attempt) -> RefineOutcome {
        let result = tokio::select! {
            _ = self.cancel.cancelled() => {
                info!(session = %self.id, attempt = attempt.seq, "Refinement cancelled");
                self.state.lock().await.abandon_refine();
                return RefineOutcome::Cancelled;
            }
            result = self.refiner.refine(&attempt.system_prompt, &attempt.user_prompt) => result,
        };

        let mut state = self.state.lock().await;
        if self.cancel.is_cancelled() {
            state.abandon_refine();
            return RefineOutcome::Cancelled;
        }
        if attempt.seq != self.latest_attempt.load(Ordering::SeqCst) {
            info!(session = %self.id, attempt = attempt.seq, "Discarding superseded refinement");
            return RefineOutcome::Superseded;
        }

        match result {
            Ok(result) => {
                state.complete(result);
                RefineOutcome::Completed
            }
            Err(e) => {
                warn!(session = %self.id, "Refinement failed: {e}");
                state.fail(e.to_string());
                RefineOutcome::Failed
            }
        }
    }
}
