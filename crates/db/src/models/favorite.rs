//! Rows of `user_favorites`.

use bedwatch_core::favorite::{Favorite, FavoriteWithStats};
use bedwatch_core::types::{DbId, Timestamp, UserId};
use sqlx::FromRow;

/// A row from the `user_favorites` table.
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteRow {
    pub id: DbId,
    pub user_id: UserId,
    pub ward_name: String,
    pub created_at: Timestamp,
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            ward_name: row.ward_name,
            created_at: row.created_at,
        }
    }
}

/// A favorite left-joined with its ward's aggregate figures.
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteWithStatsRow {
    pub id: DbId,
    pub ward_name: String,
    pub created_at: Timestamp,
    pub hospital_count: i64,
    pub total_places: i64,
    pub last_scraped_at: Option<Timestamp>,
}

impl From<FavoriteWithStatsRow> for FavoriteWithStats {
    fn from(row: FavoriteWithStatsRow) -> Self {
        Self {
            id: row.id,
            ward_name: row.ward_name,
            created_at: row.created_at,
            hospital_count: row.hospital_count,
            total_places: row.total_places,
            last_scraped_at: row.last_scraped_at,
        }
    }
}
