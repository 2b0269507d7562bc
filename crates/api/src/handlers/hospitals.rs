use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use bedwatch_core::backend::AggregationBackend;
use bedwatch_core::error::CoreError;
use bedwatch_core::query::HospitalListParams;

use crate::error::AppResult;
use crate::extract::ValidQuery;
use crate::middleware::auth::AuthUser;
use crate::response::{ListResponse, PageMeta};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /wards/{ward_name}/hospitals?district=&search=&order=&limit=&offset=
// ---------------------------------------------------------------------------

/// List the hospitals reporting one ward.
///
/// The ward name must match exactly; a ward absent from the records is
/// `NOT_FOUND` rather than an empty page.
pub async fn list_hospitals(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(ward_name): Path<String>,
    ValidQuery(params): ValidQuery<HospitalListParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.into_query()?;

    if !state.backend.ward_exists(&ward_name).await? {
        return Err(CoreError::not_found("Ward", ward_name).into());
    }

    let page = state.backend.hospitals_in_ward(&ward_name, &query).await?;

    tracing::debug!(
        ward_name = %ward_name,
        order = query.order.as_str(),
        total = page.total,
        "Listed ward hospitals"
    );

    Ok(Json(ListResponse {
        data: page.items,
        meta: PageMeta::new(page.total, query.page),
    }))
}
