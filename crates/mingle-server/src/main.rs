mod config;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use config::ServerConfig;
use state::AppState;

fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/ai/summarize-bio", post(handlers::profile::summarize_bio))
        .route("/ai/rank-contact", post(handlers::ranking::rank_contact))
        .route("/ai/rank-contacts", post(handlers::ranking::rank_contacts))
        .route("/ai/draft-outreach", post(handlers::profile::draft_outreach))
        .route("/ai/sync-profile-rag", post(handlers::profile::sync_profile))
        .route("/ai/process-voice-note", post(handlers::voice_note::process_voice_note))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/ai/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = ServerConfig::from_env();
    let state = Arc::new(AppState::new(&config));

    if let Err(e) = state.corpus.rebuild().await {
        warn!(
            "Retrieval index unavailable at startup, ranking will use every candidate: {}",
            e
        );
    }

    info!("Starting server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use mingle_core::{
        Contact, ContactDirectory, ContactRecord, GenerationRequest, GenerationResult,
        GenerationTier, MingleError,
    };
    use mingle_pipeline::{CorpusIndex, HashedIndexBuilder};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct OfflineTier;

    #[async_trait]
    impl GenerationTier for OfflineTier {
        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> Result<GenerationResult, MingleError> {
            Err(MingleError::LlmError("connection refused".into()))
        }
    }

    struct OneContact;

    #[async_trait]
    impl ContactDirectory for OneContact {
        async fn lookup(&self, name: &str) -> Result<ContactRecord, MingleError> {
            if !"Jordan Lee".to_lowercase().contains(&name.trim().to_lowercase()) {
                return Ok(ContactRecord::missing(name));
            }
            Ok(ContactRecord::Found(Contact {
                name: "Jordan Lee".into(),
                role: "PM".into(),
                company: "Stripe".into(),
                email: "jordan.lee@stripe.com".into(),
                bio: String::new(),
                can_help_with: vec![],
                linkedin_url: None,
            }))
        }
    }

    fn test_app(corpus_dir: &std::path::Path) -> (Router, Arc<AppState>) {
        let corpus = Arc::new(CorpusIndex::new(corpus_dir, Box::new(HashedIndexBuilder)));
        let state = Arc::new(AppState::assemble(
            Arc::new(OfflineTier),
            false,
            Arc::new(OneContact),
            corpus,
            8,
        ));
        (app(state.clone()), state)
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health_reports_capabilities() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = test_app(dir.path());

        let (status, body) = send(app, "GET", "/ai/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["index_loaded"], false);
        assert_eq!(body["cloud_configured"], false);
    }

    #[tokio::test]
    async fn test_voice_note_requires_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = test_app(dir.path());

        let request = json!({"transcript": "  "});
        let (status, body) = send(app, "POST", "/ai/process-voice-note", Some(request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "transcript is required");
    }

    #[tokio::test]
    async fn test_voice_note_degrades_when_tiers_are_down() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = test_app(dir.path());

        let transcript = "Met Jordan at the fintech meetup, we talked about Stripe and UX design.";
        let request = json!({ "transcript": transcript });
        let (status, body) = send(app, "POST", "/ai/process-voice-note", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["source"], "demo-mode");
        assert_eq!(body["contact_email"], "jordan.lee@stripe.com");
        assert_eq!(body["followup"]["type"], "email");
        assert_eq!(body["followup"]["subject"], "Great meeting you - Stripe and UX design");
    }

    #[tokio::test]
    async fn test_sync_profile_loads_index() {
        let dir = tempfile::tempdir().unwrap();
        let (app, state) = test_app(dir.path());

        let profile = json!({
            "profile_id": "p1",
            "name": "Maya Chen",
            "role": "Design Lead",
            "company": "Figma"
        });
        let (status, body) = send(app.clone(), "POST", "/ai/sync-profile-rag", Some(profile)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["profile_id"], "p1");
        assert!(dir.path().join("p1.txt").exists());
        assert!(state.corpus.is_loaded());

        let bad = json!({"profile_id": "../p2", "name": "Nobody"});
        let (status, _) = send(app, "POST", "/ai/sync-profile-rag", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rank_contacts_scores_everyone_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = test_app(dir.path());

        let request = json!({
            "query_looking_for": "designer",
            "query_domain": "fintech",
            "candidates": [
                {"id": "a", "name": "Ann", "role": "Designer", "company": "Acme"},
                {"id": "b", "name": "Bo", "role": "Engineer", "company": "Acme"}
            ]
        });
        let (status, body) = send(app, "POST", "/ai/rank-contacts", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        let rankings = body["rankings"].as_array().unwrap();
        assert_eq!(rankings.len(), 2);
        assert_eq!(rankings[0]["contact_id"], "a");
        assert_eq!(rankings[0]["match_score"], 0.0);
        assert_eq!(rankings[0]["source"], "unknown");
    }

    #[tokio::test]
    async fn test_summarize_bio_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = test_app(dir.path());

        let request = json!({"name": "Maya", "role": "Design Lead", "company": "Figma"});
        let (status, body) = send(app, "POST", "/ai/summarize-bio", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bio_summary"], "Design Lead at Figma");
    }
}
