use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::favorites;
use crate::state::AppState;

/// Favorite routes mounted at `/users/me/favorites`.
///
/// ```text
/// GET    /                     -> list_favorites
/// POST   /                     -> add_favorite
/// DELETE /by-ward/{ward_name}  -> remove_favorite
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(favorites::list_favorites).post(favorites::add_favorite),
        )
        .route("/by-ward/{ward_name}", delete(favorites::remove_favorite))
}
