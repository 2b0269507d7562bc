//! Advisory reads: system status and the current insight banner.
//!
//! Neither endpoint fails. A backend error is logged and replaced by the
//! "no data" answer so that pages embedding these panels still render.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bedwatch_core::backend::{BackendError, StatusBackend};
use bedwatch_core::freshness;
use bedwatch_core::status::{SystemStatus, SUCCESS_RATE_WINDOW_DAYS};
use chrono::{Duration, Utc};

use crate::response::DataResponse;
use crate::state::AppState;

/// Collapse a failed advisory read into `None`.
fn degrade<T>(result: Result<T, BackendError>, what: &'static str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, what, "Advisory read failed, serving without it");
            None
        }
    }
}

/// GET /status
pub async fn get_status(State(state): State<AppState>) -> Json<DataResponse<SystemStatus>> {
    let now = Utc::now();

    let status = match degrade(state.backend.record_counts().await, "record counts") {
        Some(counts) => {
            let freshness = freshness::evaluate(counts.last_scraped_at, now);
            let since = now - Duration::days(SUCCESS_RATE_WINDOW_DAYS);
            let rate = degrade(
                state.backend.scraping_success_rate(since).await,
                "scraping success rate",
            )
            .flatten();
            SystemStatus::from_parts(counts, freshness, rate)
        }
        None => SystemStatus::unavailable(),
    };

    Json(DataResponse { data: status })
}

/// GET /insights/current
///
/// `204 No Content` when no insight is active (or none could be read).
pub async fn get_current_insight(State(state): State<AppState>) -> Response {
    let insight = degrade(
        state.backend.current_insight(Utc::now()).await,
        "current insight",
    )
    .flatten();

    match insight {
        Some(insight) => Json(DataResponse { data: insight }).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
