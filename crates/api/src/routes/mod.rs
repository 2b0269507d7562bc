pub mod favorites;
pub mod health;
pub mod status;
pub mod wards;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /wards                                    ward aggregates (auth)
/// /wards/{ward_name}/hospitals              hospitals of one ward (auth)
///
/// /users/me/favorites                       list, add (auth)
/// /users/me/favorites/by-ward/{ward_name}   remove (auth)
///
/// /status                                   system status (public)
/// /insights/current                         active insight (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/wards", wards::router())
        .nest("/users/me/favorites", favorites::router())
        .merge(status::router())
}
