//! Font and label size listings.

use axum::{Json, extract::State};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::label::LabelSpec;

use super::super::state::AppState;

/// Font listing returned by the API.
#[derive(Debug, Serialize)]
pub struct FontList {
    /// Default font as `"Family (Style)"`
    pub default: String,
    pub fonts: BTreeMap<String, Vec<String>>,
}

/// Label size listing returned by the API.
#[derive(Debug, Serialize)]
pub struct LabelSizeList {
    pub default: String,
    pub default_orientation: String,
    pub sizes: Vec<LabelSpec>,
}

/// GET /api/fonts - List font families and their styles.
pub async fn fonts(State(state): State<Arc<AppState>>) -> Json<FontList> {
    let orchestrator = &state.orchestrator;
    Json(FontList {
        default: orchestrator.defaults().font.to_string(),
        fonts: orchestrator.fonts().summary(),
    })
}

/// GET /api/label-sizes - List known label sizes.
pub async fn label_sizes(State(state): State<Arc<AppState>>) -> Json<LabelSizeList> {
    let orchestrator = &state.orchestrator;
    let defaults = orchestrator.defaults();
    Json(LabelSizeList {
        default: defaults.label_size.clone(),
        default_orientation: format!("{:?}", defaults.orientation).to_lowercase(),
        sizes: orchestrator.labels().iter().cloned().collect(),
    })
}
