//! Server state and configuration.

use std::sync::Arc;

use crate::orchestrator::Orchestrator;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8013")
    pub listen_addr: String,
}

/// Application state shared across handlers.
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }
}
