pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::compliance::handlers as compliance;
use crate::documents::handlers as documents;
use crate::jobs::handlers as jobs;
use crate::profile::handlers as profile;
use crate::profile::import::MAX_CV_BYTES;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

/// Uploads carry a CV or a rendered document plus some JSON fields.
const MAX_UPLOAD_BYTES: usize = MAX_CV_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile)
                .put(profile::handle_put_profile)
                .delete(profile::handle_delete_profile),
        )
        .route(
            "/api/v1/profile/import",
            post(profile::handle_import_profile),
        )
        // Job analysis
        .route("/api/v1/jobs/analyze", post(jobs::handle_analyze_job))
        // Tailoring
        .route("/api/v1/tailor", post(tailoring::handle_tailor))
        // Documents
        .route(
            "/api/v1/documents/compliance",
            post(documents::handle_generate_documents),
        )
        .route(
            "/api/v1/documents/validate",
            post(compliance::handle_validate_document),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::compliance::extraction::DocumentTextExtractor;
    use crate::compliance::font::StandardFontValidator;
    use crate::compliance::ComplianceScorer;
    use crate::config::Config;
    use crate::documents::HttpDocumentRenderer;
    use crate::jobs::{JobAnalyzerClient, LlmJobAnalyzer};
    use crate::llm_client::LlmClient;
    use crate::profile::FileProfileStore;

    fn test_state(dir: &tempfile::TempDir) -> AppState {
        let config = Config {
            port: 0,
            rust_log: "debug".to_string(),
            anthropic_api_key: None,
            redis_url: None,
            profile_path: dir.path().join("profile.json").display().to_string(),
            profile_quota_bytes: 1 << 20,
            analysis_cache_ttl: Duration::from_secs(1800),
            analyzer_min_interval: Duration::from_millis(1),
            analyzer_timeout: Duration::from_secs(5),
            renderer_url: None,
            ats_scoring_url: None,
            max_pages: 2,
            enable_bullet_enhancement: false,
        };
        let llm = LlmClient::new(None);
        AppState {
            analyzer: Arc::new(JobAnalyzerClient::new(
                Arc::new(LlmJobAnalyzer::new(llm.clone())),
                config.analysis_cache_ttl,
                config.analyzer_min_interval,
                config.analyzer_timeout,
            )),
            profiles: Arc::new(FileProfileStore::new(
                &config.profile_path,
                config.profile_quota_bytes,
            )),
            renderer: Arc::new(HttpDocumentRenderer::new(None)),
            compliance: ComplianceScorer::new(
                Arc::new(DocumentTextExtractor),
                Arc::new(StandardFontValidator),
                None,
            ),
            llm,
            config,
        }
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn profile_json() -> Value {
        json!({
            "header": {"name": "Ada Lovelace", "title": "Engineer", "email": "ada@example.com"},
            "summary": "Engineer.",
            "experiences": [{
                "job_title": "Engineer",
                "company": "ACME",
                "bullets": [
                    {"category": "Backend", "description": "Built Python services using GPU acceleration"},
                    {"category": "Ops", "description": "Ran Docker deployments"}
                ]
            }]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(&dir));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["service"], "cv-tailor");
        assert_eq!(body["analyzer"]["cached_analyses"], 0);
    }

    #[tokio::test]
    async fn test_profile_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(&dir));

        let missing = app
            .clone()
            .oneshot(Request::builder().uri("/api/v1/profile").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(missing).await["error"]["code"], "NOT_FOUND");

        let saved = app
            .clone()
            .oneshot(json_request("PUT", "/api/v1/profile", profile_json()))
            .await
            .unwrap();
        assert_eq!(saved.status(), StatusCode::OK);
        let saved = body_json(saved).await;
        assert!(saved["experiences"][0]["bullets"][0]["id"].is_string());

        let loaded = app
            .clone()
            .oneshot(Request::builder().uri("/api/v1/profile").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let loaded = body_json(loaded).await;
        assert_eq!(loaded["version"], 1);
        assert_eq!(loaded["profile"], saved);

        let cleared = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(cleared.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_empty_profile_name_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(&dir));
        let mut profile = profile_json();
        profile["header"]["name"] = json!("");
        let response = app
            .oneshot(json_request("PUT", "/api/v1/profile", profile))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_short_job_description_is_400_with_hint() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(&dir));
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/jobs/analyze",
                json!({"job_description": "Rust dev"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["hint"].is_string());
    }

    #[tokio::test]
    async fn test_tailor_with_inline_profile() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(&dir));
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/tailor",
                json!({
                    "job_analysis": {
                        "mustHaveKeywords": ["Python", "GPU"],
                        "preferredKeywords": ["Docker"],
                        "niceToHaveKeywords": ["AWS"]
                    },
                    "profile": profile_json()
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["match_score"], 75);
        assert_eq!(body["max_pages"], 2);
        assert_eq!(
            body["content"]["experiences"][0]["bullets"][0]["description"],
            "Built Python services using GPU acceleration"
        );
    }

    #[tokio::test]
    async fn test_tailor_rejects_duplicate_bullet_ids() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(&dir));
        let shared = "11111111-1111-1111-1111-111111111111";
        let mut profile = profile_json();
        profile["experiences"][0]["bullets"][0]["id"] = json!(shared);
        profile["experiences"][0]["bullets"][1]["id"] = json!(shared);
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/tailor",
                json!({
                    "job_analysis": {"mustHaveKeywords": ["Python", "GPU"]},
                    "profile": profile
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("experiences[0].bullets[1].id"));
    }

    #[tokio::test]
    async fn test_unknown_format_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(&dir));
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/documents/compliance",
                json!({
                    "job_analysis": {"mustHaveKeywords": ["Python"]},
                    "profile": profile_json(),
                    "formats": ["odt"]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generation_without_renderer_reports_failure_per_format() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(&dir));
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/documents/compliance",
                json!({
                    "job_analysis": {"mustHaveKeywords": ["Python"]},
                    "profile": profile_json(),
                    "formats": ["pdf", "docx"]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let documents = body["documents"].as_array().unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents.iter().all(|d| d["status"] == "failed"));
        assert_eq!(documents[0]["format"], "pdf");
    }
}
