//! Handler for the ward overview.
//!
//! Aggregates every ward's records, marks the caller's favorites and
//! attaches freshness metadata to the page.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use bedwatch_core::backend::AggregationBackend;
use bedwatch_core::freshness;
use bedwatch_core::query::{paginate, WardListParams};
use bedwatch_core::types::Timestamp;
use bedwatch_core::ward::WardFilter;
use chrono::Utc;
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::ValidQuery;
use crate::middleware::auth::AuthUser;
use crate::response::{ListResponse, PageMeta};
use crate::state::AppState;

/// `meta` of `GET /wards`: pagination plus data freshness.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WardListMeta {
    #[serde(flatten)]
    pub page: PageMeta,
    pub last_scrape_time: Option<Timestamp>,
    pub is_stale: bool,
}

// ---------------------------------------------------------------------------
// GET /wards?search=&favorites_only=&limit=&offset=
// ---------------------------------------------------------------------------

/// List ward aggregates sorted by total available places.
pub async fn list_wards(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<WardListParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.into_query()?;

    let filter = WardFilter {
        search: query.search,
        user_id: Some(auth.user_id),
        favorites_only: query.favorites_only,
    };
    let wards = state.backend.aggregate_wards(&filter).await?;
    let last_scrape_time = state.backend.latest_scrape_time().await?;
    let freshness = freshness::evaluate(last_scrape_time, Utc::now());

    let page = paginate(wards, query.page);

    tracing::debug!(
        user_id = %auth.user_id,
        total = page.total,
        is_stale = freshness.is_stale,
        "Listed wards"
    );

    Ok(Json(ListResponse {
        data: page.items,
        meta: WardListMeta {
            page: PageMeta::new(page.total, query.page),
            last_scrape_time,
            is_stale: freshness.is_stale,
        },
    }))
}
