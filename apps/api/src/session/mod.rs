//! One in-memory `PromptState` per browser session, driven by its controller.

pub mod controller;
pub mod handlers;
pub mod state;
pub mod store;

pub use controller::{RefineOutcome, SessionSnapshot};
pub use state::PromptState;
pub use store::SessionStore;
