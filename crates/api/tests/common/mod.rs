#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use bedwatch_api::auth::jwt::{generate_access_token, JwtConfig};
use bedwatch_api::config::{BackendKind, ServerConfig};
use bedwatch_api::router::build_app_router;
use bedwatch_api::state::AppState;
use bedwatch_core::backend::Backend;
use bedwatch_core::hospital::HospitalWardRecord;
use bedwatch_core::memory::MemoryBackend;
use bedwatch_core::types::UserId;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        backend: BackendKind::Memory,
        seed_file: None,
        favorite_cleanup_interval_secs: 0,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            audience: None,
        },
    }
}

/// Build the full application router over `backend`, with the same
/// middleware stack production uses.
pub fn build_test_app(backend: Arc<dyn Backend>) -> Router {
    let config = test_config();
    let state = AppState {
        backend,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Bearer token for `user_id`, signed with the test secret.
pub fn token_for(user_id: UserId) -> String {
    generate_access_token(user_id, 15, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn record(ward: &str, hospital: &str, district: &str, places: &str) -> HospitalWardRecord {
    HospitalWardRecord {
        id: 0,
        ward_name: ward.to_string(),
        hospital_name: hospital.to_string(),
        district: Some(district.to_string()),
        available_places: places.to_string(),
        ward_link: None,
        scraped_at: Utc::now() - Duration::hours(1),
        source_updated_text: None,
    }
}

/// Memory backend holding a small, fresh record set:
///
/// - Kardiologia: Szpital A 15, Szpital B 8, Szpital C 20 (total 43)
/// - Neurologia: Szpital A "brak" (total 0)
/// - Okulistyka: Szpital B 5
pub async fn seeded_backend() -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .replace_records(vec![
            record("Kardiologia", "Szpital A", "Śródmieście", "15"),
            record("Kardiologia", "Szpital B", "Podgórze", "8"),
            record("Kardiologia", "Szpital C", "Śródmieście", "20"),
            record("Neurologia", "Szpital A", "Śródmieście", "brak"),
            record("Okulistyka", "Szpital B", "Podgórze", "5"),
        ])
        .await;
    backend
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

fn request(method: Method, uri: &str, token: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .header("content-type", "application/json")
        .body(body)
        .unwrap()
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response {
    app.oneshot(request(Method::GET, uri, token, Body::empty()))
        .await
        .unwrap()
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response {
    app.oneshot(request(
        Method::POST,
        uri,
        token,
        Body::from(body.to_string()),
    ))
    .await
    .unwrap()
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response {
    app.oneshot(request(Method::DELETE, uri, token, Body::empty()))
        .await
        .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
