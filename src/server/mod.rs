//! # HTTP Server for Label Printing
//!
//! Exposes the preview and print flows over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! etiqueta serve --port 8013 tcp://192.168.0.23:9100
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET, POST | `/api/preview/text` | PNG, or base64 text with `?return_format=base64` |
//! | GET, POST | `/api/print/text` | JSON `{success, error?, message?, data?}` |
//! | GET | `/api/fonts` | font families and styles |
//! | GET | `/api/label-sizes` | known label sizes |

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    response::Redirect,
    routing::get,
};
use std::sync::Arc;

use crate::error::LabelError;
use crate::orchestrator::Orchestrator;

/// Build the router for the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/api/label-sizes") }))
        .route(
            "/api/preview/text",
            get(handlers::label::preview).post(handlers::label::preview),
        )
        .route(
            "/api/print/text",
            get(handlers::label::print).post(handlers::label::print),
        )
        .route("/api/fonts", get(handlers::catalog::fonts))
        .route("/api/label-sizes", get(handlers::catalog::label_sizes))
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: ServerConfig, orchestrator: Arc<Orchestrator>) -> Result<(), LabelError> {
    let target = orchestrator.settings().target.clone();
    let dry_run = orchestrator.settings().dry_run;
    let app = router(Arc::new(AppState::new(orchestrator)));

    log::info!("Listening on: {}", config.listen_addr);
    if dry_run {
        log::info!("Dry run: labels are encoded but not sent to {}", target);
    } else {
        log::info!("Printer target: {}", target);
    }

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            LabelError::Transport(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| LabelError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}
