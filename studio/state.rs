use std::sync::{Arc, Mutex, MutexGuard};

use plant_doctor::ui::PreviewRegistry;
use plant_doctor::workflow::PredictWorkflow;
use plant_doctor::Session;

/// Everything the request handlers share.
pub struct StudioState {
    /// The page's UI state and the preview it holds.
    pub session: Session,
    /// Preview table, also reachable without touching the session.
    pub previews: PreviewRegistry,
}

impl StudioState {
    pub fn new(workflow: PredictWorkflow) -> Self {
        let previews = PreviewRegistry::new();
        StudioState { session: Session::new(workflow, previews.clone()), previews }
    }
}

/// Shared state type — an `Arc<Mutex<StudioState>>` passed to every handler.
pub type SharedState = Arc<Mutex<StudioState>>;

/// Locks the shared state, recovering from a poisoned lock.
pub fn lock(state: &SharedState) -> MutexGuard<'_, StudioState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
