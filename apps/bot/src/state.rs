use std::sync::Arc;

use crate::fanout::scheduler::CycleRunner;

/// Shared application state injected into route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Shared with the periodic scheduler so manual and timed cycles never overlap.
    pub cycles: Arc<CycleRunner>,
}
