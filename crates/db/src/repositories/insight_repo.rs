//! Repository for the `insights` table.

use bedwatch_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::insight::InsightRow;

/// Provides read access to advisory insights.
pub struct InsightRepo;

impl InsightRepo {
    /// The most recently started insight active at `now`, if any.
    pub async fn find_current(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Option<InsightRow>, sqlx::Error> {
        sqlx::query_as::<_, InsightRow>(
            "SELECT id, title, body, severity, active_from, active_until \
             FROM insights \
             WHERE active_from <= $1 \
               AND (active_until IS NULL OR active_until > $1) \
             ORDER BY active_from DESC, id DESC \
             LIMIT 1",
        )
        .bind(now)
        .fetch_optional(pool)
        .await
    }
}
