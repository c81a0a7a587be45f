use std::sync::Arc;

use crate::refinement::Refiner;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable refinement backend. Default: GeminiRefiner.
    pub refiner: Arc<dyn Refiner>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(refiner: Arc<dyn Refiner>) -> Self {
        Self {
            sessions: SessionStore::new(Arc::clone(&refiner)),
            refiner,
        }
    }
}
