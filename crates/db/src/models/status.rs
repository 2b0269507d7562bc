use bedwatch_core::status::RecordCounts;
use bedwatch_core::types::Timestamp;
use sqlx::FromRow;

/// Distinct counts over `hospital_wards`.
#[derive(Debug, Clone, FromRow)]
pub struct RecordCountsRow {
    pub total_wards: i64,
    pub total_hospitals: i64,
    pub last_scraped_at: Option<Timestamp>,
}

impl From<RecordCountsRow> for RecordCounts {
    fn from(row: RecordCountsRow) -> Self {
        Self {
            total_wards: row.total_wards,
            total_hospitals: row.total_hospitals,
            last_scraped_at: row.last_scraped_at,
        }
    }
}
