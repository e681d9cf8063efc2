pub mod profile;
pub mod ranking;
pub mod voice_note;

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        index_loaded: state.corpus.is_loaded(),
        cloud_configured: state.cloud_configured,
    })
}
