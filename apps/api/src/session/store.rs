use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::refinement::Refiner;
use crate::session::controller::PromptController;

/// In-memory registry of live sessions. Nothing is persisted; a restart forgets all.
/// Sessions not looked up for longer than the idle TTL are closed by the sweeper.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<PromptController>>>>,
    refiner: Arc<dyn Refiner>,
}

impl SessionStore {
    pub fn new(refiner: Arc<dyn Refiner>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            refiner,
        }
    }

    /// Opens a session pre-populated with the default prompts.
    pub async fn create(&self) -> Arc<PromptController> {
        let controller = Arc::new(PromptController::new(Arc::clone(&self.refiner)));
        self.sessions
            .write()
            .await
            .insert(controller.id(), Arc::clone(&controller));
        info!(session = %controller.id(), "Session opened");
        controller
    }

    /// Looks a session up and marks it as in use.
    pub async fn get(&self, id: Uuid) -> Result<Arc<PromptController>, AppError> {
        let controller = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        controller.touch().await;
        Ok(controller)
    }

    /// Drops the session and cancels its in-flight refinement, if any.
    pub async fn close(&self, id: Uuid) -> Result<(), AppError> {
        let controller = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        controller.close();
        info!(session = %id, "Session closed");
        Ok(())
    }

    /// Closes every session idle for longer than `ttl`, cancelling any call it
    /// still has in flight. Returns how many were removed.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let mut expired = Vec::new();
        for (id, controller) in sessions.iter() {
            if controller.idle_for().await > ttl {
                expired.push(*id);
            }
        }
        for id in &expired {
            if let Some(controller) = sessions.remove(id) {
                controller.close();
                info!(session = %id, "Session evicted after idling");
            }
        }
        expired.len()
    }

    /// Runs `evict_idle` every `every` until the runtime shuts down.
    pub fn spawn_sweeper(&self, ttl: Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(ttl).await;
                if evicted > 0 {
                    debug!(evicted, "Idle session sweep");
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
