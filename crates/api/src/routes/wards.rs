use axum::routing::get;
use axum::Router;

use crate::handlers::{hospitals, wards};
use crate::state::AppState;

/// Ward routes mounted at `/wards`.
///
/// ```text
/// GET /                        -> list_wards
/// GET /{ward_name}/hospitals   -> list_hospitals
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(wards::list_wards))
        .route("/{ward_name}/hospitals", get(hospitals::list_hospitals))
}
