//! Repository for the `hospital_wards` table.
//!
//! Rows are written by the external scraper; this repository only reads and
//! aggregates them. Availability parsing runs in SQL through the
//! `parse_available_places` function so the database can sum and sort
//! numerically.

use bedwatch_core::query::{HospitalOrder, HospitalQuery};
use bedwatch_core::types::{Timestamp, UserId};
use sqlx::PgPool;

use super::contains_pattern;
use crate::models::hospital_ward::{HospitalWardRow, WardAggregateRow};
use crate::models::status::RecordCountsRow;

/// Column list for `hospital_wards` queries.
const COLUMNS: &str = "\
    id, ward_name, hospital_name, district, available_places, \
    ward_link, source_updated_text, scraped_at";

/// Shared `WHERE` clause for per-ward hospital listings.
///
/// `$1` ward name, `$2` district (case-insensitive equality), `$3` hospital
/// name `ILIKE` pattern.
const WARD_HOSPITALS_FILTER: &str = "\
    ward_name = $1 \
    AND ($2::text IS NULL OR lower(district) = lower($2)) \
    AND ($3::text IS NULL OR hospital_name ILIKE $3)";

/// Provides read access to scraped hospital ward rows.
pub struct HospitalWardRepo;

impl HospitalWardRepo {
    /// Group rows by ward name and compute per-ward figures.
    ///
    /// `is_favorite` is relative to `user_id`; with `favorites_only` only the
    /// user's favorite wards are returned. Sorted by total places descending,
    /// then ward name in byte order (matching `bedwatch_core::ward::sort_wards`).
    pub async fn aggregate_wards(
        pool: &PgPool,
        search: Option<&str>,
        user_id: Option<UserId>,
        favorites_only: bool,
    ) -> Result<Vec<WardAggregateRow>, sqlx::Error> {
        let pattern = search.map(contains_pattern);

        sqlx::query_as::<_, WardAggregateRow>(
            "SELECT w.ward_name, \
                    COUNT(DISTINCT w.hospital_name) AS hospital_count, \
                    COALESCE(SUM(parse_available_places(w.available_places)), 0)::BIGINT \
                        AS total_places, \
                    (f.ward_name IS NOT NULL) AS is_favorite, \
                    MAX(w.scraped_at) AS last_scraped_at \
             FROM hospital_wards w \
             LEFT JOIN user_favorites f \
                    ON f.ward_name = w.ward_name AND f.user_id = $2 \
             WHERE ($1::text IS NULL OR w.ward_name ILIKE $1) \
             GROUP BY w.ward_name, f.ward_name \
             HAVING (NOT $3::boolean OR f.ward_name IS NOT NULL) \
             ORDER BY total_places DESC, w.ward_name COLLATE \"C\" ASC",
        )
        .bind(pattern)
        .bind(user_id)
        .bind(favorites_only)
        .fetch_all(pool)
        .await
    }

    /// Whether any row carries exactly this ward name.
    pub async fn ward_exists(pool: &PgPool, ward_name: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM hospital_wards WHERE ward_name = $1)",
        )
        .bind(ward_name)
        .fetch_one(pool)
        .await
    }

    /// List the hospitals of one ward with filtering, ordering and pagination.
    pub async fn list_in_ward(
        pool: &PgPool,
        ward_name: &str,
        query: &HospitalQuery,
    ) -> Result<Vec<HospitalWardRow>, sqlx::Error> {
        let order_by = match query.order {
            HospitalOrder::AvailablePlacesDesc => {
                "parse_available_places(available_places) DESC, hospital_name COLLATE \"C\" ASC"
            }
            HospitalOrder::HospitalNameAsc => "hospital_name COLLATE \"C\" ASC, id ASC",
        };
        let sql = format!(
            "SELECT {COLUMNS} FROM hospital_wards \
             WHERE {WARD_HOSPITALS_FILTER} \
             ORDER BY {order_by} \
             LIMIT $4 OFFSET $5"
        );

        sqlx::query_as::<_, HospitalWardRow>(&sql)
            .bind(ward_name)
            .bind(query.district.as_deref())
            .bind(query.search.as_deref().map(contains_pattern))
            .bind(query.page.limit)
            .bind(query.page.offset)
            .fetch_all(pool)
            .await
    }

    /// Count the rows [`list_in_ward`](Self::list_in_ward) would page over.
    pub async fn count_in_ward(
        pool: &PgPool,
        ward_name: &str,
        query: &HospitalQuery,
    ) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM hospital_wards WHERE {WARD_HOSPITALS_FILTER}");
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(ward_name)
            .bind(query.district.as_deref())
            .bind(query.search.as_deref().map(contains_pattern))
            .fetch_one(pool)
            .await
    }

    /// Maximum `scraped_at` across all rows.
    pub async fn latest_scrape_time(pool: &PgPool) -> Result<Option<Timestamp>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<Timestamp>>("SELECT MAX(scraped_at) FROM hospital_wards")
            .fetch_one(pool)
            .await
    }

    /// Distinct ward / hospital counts and the latest scrape time.
    pub async fn record_counts(pool: &PgPool) -> Result<RecordCountsRow, sqlx::Error> {
        sqlx::query_as::<_, RecordCountsRow>(
            "SELECT COUNT(DISTINCT ward_name) AS total_wards, \
                    COUNT(DISTINCT hospital_name) AS total_hospitals, \
                    MAX(scraped_at) AS last_scraped_at \
             FROM hospital_wards",
        )
        .fetch_one(pool)
        .await
    }
}
