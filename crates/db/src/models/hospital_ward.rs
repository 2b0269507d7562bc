//! Rows of `hospital_wards` and the ward aggregate query.

use bedwatch_core::hospital::HospitalWardRecord;
use bedwatch_core::types::{DbId, Timestamp};
use bedwatch_core::ward::WardAggregate;
use sqlx::FromRow;

/// A row from the `hospital_wards` table.
#[derive(Debug, Clone, FromRow)]
pub struct HospitalWardRow {
    pub id: DbId,
    pub ward_name: String,
    pub hospital_name: String,
    pub district: Option<String>,
    pub available_places: String,
    pub ward_link: Option<String>,
    pub source_updated_text: Option<String>,
    pub scraped_at: Timestamp,
}

impl From<HospitalWardRow> for HospitalWardRecord {
    fn from(row: HospitalWardRow) -> Self {
        Self {
            id: row.id,
            ward_name: row.ward_name,
            hospital_name: row.hospital_name,
            district: row.district,
            available_places: row.available_places,
            ward_link: row.ward_link,
            scraped_at: row.scraped_at,
            source_updated_text: row.source_updated_text,
        }
    }
}

/// One group of the ward aggregate query.
#[derive(Debug, Clone, FromRow)]
pub struct WardAggregateRow {
    pub ward_name: String,
    pub hospital_count: i64,
    pub total_places: i64,
    pub is_favorite: bool,
    pub last_scraped_at: Option<Timestamp>,
}

impl From<WardAggregateRow> for WardAggregate {
    fn from(row: WardAggregateRow) -> Self {
        Self {
            ward_name: row.ward_name,
            hospital_count: row.hospital_count,
            total_places: row.total_places,
            is_favorite: row.is_favorite,
            last_scraped_at: row.last_scraped_at,
        }
    }
}
