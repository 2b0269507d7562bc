//! Rows of `insights`.

use bedwatch_core::status::{Insight, InsightSeverity};
use bedwatch_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `insights` table.
#[derive(Debug, Clone, FromRow)]
pub struct InsightRow {
    pub id: DbId,
    pub title: String,
    pub body: String,
    pub severity: String,
    pub active_from: Timestamp,
    pub active_until: Option<Timestamp>,
}

impl TryFrom<InsightRow> for Insight {
    type Error = String;

    fn try_from(row: InsightRow) -> Result<Self, Self::Error> {
        let severity = InsightSeverity::from_str_value(&row.severity)
            .ok_or_else(|| format!("Unknown insight severity '{}'", row.severity))?;
        Ok(Self {
            id: row.id,
            title: row.title,
            body: row.body,
            severity,
            active_from: row.active_from,
            active_until: row.active_until,
        })
    }
}
