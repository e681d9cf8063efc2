use std::sync::Arc;

use axum::{extract::State, Json};
use mingle_pipeline::FollowupResponse;

use crate::dto::VoiceNoteRequest;
use crate::error::AppError;
use crate::state::AppState;

pub async fn process_voice_note(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VoiceNoteRequest>,
) -> Result<Json<FollowupResponse>, AppError> {
    let transcript = req.transcript.as_deref().map(str::trim).unwrap_or_default();
    if transcript.is_empty() {
        return Err(AppError::BadRequest("transcript is required".into()));
    }

    Ok(Json(state.followup.process(transcript).await))
}
