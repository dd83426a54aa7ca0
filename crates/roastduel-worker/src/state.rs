//! Shared application state.

use std::sync::Arc;

use crate::scheduler::Passes;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Both scheduled passes; the routes trigger and inspect them.
    pub passes: Arc<Passes>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(passes: Arc<Passes>) -> Self {
        Self { passes }
    }
}
