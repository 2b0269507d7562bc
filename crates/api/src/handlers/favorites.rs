//! Handlers for the caller's favorite wards.
//!
//! Favorites reference wards by name only; adding a ward that currently has
//! no records is allowed. All endpoints require authentication.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bedwatch_core::backend::{BackendError, FavoritesBackend};
use bedwatch_core::error::CoreError;
use bedwatch_core::query::{AddFavoriteRequest, PaginationParams};

use crate::error::AppResult;
use crate::extract::{ValidJson, ValidQuery};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, ListResponse, PageMeta};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /users/me/favorites?limit=&offset=
// ---------------------------------------------------------------------------

/// List favorites with current ward figures, newest first.
pub async fn list_favorites(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page_request = params.into_page()?;
    let page = state
        .backend
        .list_favorites(auth.user_id, page_request)
        .await?;

    Ok(Json(ListResponse {
        data: page.items,
        meta: PageMeta::new(page.total, page_request),
    }))
}

// ---------------------------------------------------------------------------
// POST /users/me/favorites
// ---------------------------------------------------------------------------

/// Add a ward to the caller's favorites.
///
/// A ward that is already a favorite answers `409 CONFLICT`; clients treat
/// it as "already favorited".
pub async fn add_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<AddFavoriteRequest>,
) -> AppResult<impl IntoResponse> {
    let ward_name = input.into_ward_name()?;

    let favorite = match state.backend.add_favorite(auth.user_id, &ward_name).await {
        Ok(favorite) => favorite,
        Err(BackendError::Conflict(_)) => {
            return Err(CoreError::Conflict(format!(
                "Ward '{ward_name}' is already in favorites"
            ))
            .into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %auth.user_id, ward_name = %ward_name, "Favorite added");

    Ok((StatusCode::CREATED, Json(DataResponse { data: favorite })))
}

// ---------------------------------------------------------------------------
// DELETE /users/me/favorites/by-ward/{ward_name}
// ---------------------------------------------------------------------------

/// Remove a ward from the caller's favorites.
pub async fn remove_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ward_name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let removed = state
        .backend
        .remove_favorite(auth.user_id, &ward_name)
        .await?;

    if !removed {
        return Err(CoreError::not_found("Favorite", ward_name).into());
    }

    tracing::info!(user_id = %auth.user_id, ward_name = %ward_name, "Favorite removed");

    Ok(StatusCode::NO_CONTENT)
}
