//! Per-user favorite wards.
//!
//! A favorite is a soft reference to a ward name: nothing enforces that the
//! ward still exists in the scraped data.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp, UserId};

/// A (user, ward name) membership. Unique per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: DbId,
    pub user_id: UserId,
    pub ward_name: String,
    pub created_at: Timestamp,
}

/// A favorite joined with the ward's current aggregate figures.
///
/// Wards that vanished from the source data report zero hospitals, zero
/// places and no scrape time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteWithStats {
    pub id: DbId,
    pub ward_name: String,
    pub created_at: Timestamp,
    pub hospital_count: i64,
    pub total_places: i64,
    pub last_scraped_at: Option<Timestamp>,
}
