use std::sync::Arc;

use axum::{extract::State, Json};
use mingle_core::{RankQuery, RankingEntry};

use crate::dto::{RankContactRequest, RankContactsRequest, RankContactsResponse};
use crate::state::AppState;

pub async fn rank_contact(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RankContactRequest>,
) -> Json<RankingEntry> {
    let query = RankQuery {
        looking_for: req.query_looking_for,
        domain: req.query_domain,
        help_type: String::new(),
    };
    let mut contact = req.contact;
    if contact.id.trim().is_empty() {
        contact.id = "unknown".to_string();
    }
    Json(state.ranking.rank_one(&query, &contact).await)
}

pub async fn rank_contacts(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RankContactsRequest>,
) -> Json<RankContactsResponse> {
    let rankings = state.ranking.rank(&req.query(), &req.candidates).await;
    Json(RankContactsResponse { rankings })
}
