use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and job-analyzer cache counters.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cv-tailor",
        "analyzer": {
            "cached_analyses": state.analyzer.cache().len(),
            "stats": state.analyzer.stats(),
            "default_key": state.llm.has_default_key()
        }
    }))
}
