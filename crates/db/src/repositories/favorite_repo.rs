//! Repository for the `user_favorites` table.
//!
//! Favorites reference wards by name only. Creation relies on the
//! `uq_user_favorites_user_ward` constraint to reject duplicates; removal is
//! reported as a boolean so callers can tell "absent" from a failure.

use bedwatch_core::query::PageRequest;
use bedwatch_core::types::UserId;
use sqlx::PgPool;

use crate::models::favorite::{FavoriteRow, FavoriteWithStatsRow};

/// Column list for `user_favorites` queries.
const COLUMNS: &str = "id, user_id, ward_name, created_at";

/// Provides CRUD operations for user favorites.
pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Insert a favorite.
    ///
    /// A duplicate (user, ward) pair fails with a unique violation on
    /// `uq_user_favorites_user_ward`.
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        ward_name: &str,
    ) -> Result<FavoriteRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_favorites (user_id, ward_name) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FavoriteRow>(&query)
            .bind(user_id)
            .bind(ward_name)
            .fetch_one(pool)
            .await
    }

    /// Delete the user's favorite for a ward.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete_by_ward(
        pool: &PgPool,
        user_id: UserId,
        ward_name: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND ward_name = $2")
            .bind(user_id)
            .bind(ward_name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All ward names the user has favorited.
    pub async fn ward_names(pool: &PgPool, user_id: UserId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT ward_name FROM user_favorites WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Favorites joined with current ward figures, newest first.
    pub async fn list_with_stats(
        pool: &PgPool,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<FavoriteWithStatsRow>, sqlx::Error> {
        sqlx::query_as::<_, FavoriteWithStatsRow>(
            "SELECT f.id, f.ward_name, f.created_at, \
                    COUNT(DISTINCT w.hospital_name) AS hospital_count, \
                    COALESCE(SUM(parse_available_places(w.available_places)), 0)::BIGINT \
                        AS total_places, \
                    MAX(w.scraped_at) AS last_scraped_at \
             FROM user_favorites f \
             LEFT JOIN hospital_wards w ON w.ward_name = f.ward_name \
             WHERE f.user_id = $1 \
             GROUP BY f.id \
             ORDER BY f.created_at DESC, f.id DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await
    }

    pub async fn count_for_user(pool: &PgPool, user_id: UserId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_favorites WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Delete favorites whose ward name no longer appears in `hospital_wards`.
    ///
    /// Skipped entirely while `hospital_wards` is empty so a scrape cycle that
    /// is mid-replacement cannot wipe every favorite.
    pub async fn delete_orphaned(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM user_favorites f \
             WHERE EXISTS (SELECT 1 FROM hospital_wards) \
               AND NOT EXISTS ( \
                   SELECT 1 FROM hospital_wards w WHERE w.ward_name = f.ward_name \
               )",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
