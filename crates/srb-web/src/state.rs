//! Shared application state for the web server.

use std::sync::Arc;

use srb_engine::Console;

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub console: Arc<Console>,
}

impl AppState {
    pub fn new(console: Console) -> Self {
        Self { console: Arc::new(console) }
    }
}

pub type SharedState = Arc<AppState>;
