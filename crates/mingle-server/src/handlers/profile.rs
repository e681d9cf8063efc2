use std::sync::Arc;

use axum::{extract::State, Json};
use mingle_pipeline::{BioSummary, OutreachDraft};

use crate::dto::{
    DraftOutreachRequest, SummarizeBioRequest, SyncProfileRequest, SyncProfileResponse,
};
use crate::error::AppError;
use crate::state::AppState;

pub async fn summarize_bio(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummarizeBioRequest>,
) -> Json<BioSummary> {
    Json(state.profiles.summarize_bio(&req.into_profile()).await)
}

pub async fn draft_outreach(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DraftOutreachRequest>,
) -> Json<OutreachDraft> {
    let draft = state
        .profiles
        .draft_outreach(&req.sender, &req.recipient, req.context.as_deref())
        .await;
    Json(draft)
}

pub async fn sync_profile(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SyncProfileRequest>,
) -> Result<Json<SyncProfileResponse>, AppError> {
    let profile = req.into_profile();
    let path = state.corpus.sync_profile(&profile).await?;

    Ok(Json(SyncProfileResponse {
        status: "ok",
        profile_id: profile.id,
        path: path.display().to_string(),
    }))
}
