use axum::routing::get;
use axum::Router;

use crate::handlers::status;
use crate::state::AppState;

/// Public advisory routes.
///
/// ```text
/// GET /status            -> get_status
/// GET /insights/current  -> get_current_insight
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(status::get_status))
        .route("/insights/current", get(status::get_current_insight))
}
