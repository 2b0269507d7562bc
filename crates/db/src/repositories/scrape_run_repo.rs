//! Repository for the `scrape_runs` table.

use bedwatch_core::types::Timestamp;
use sqlx::PgPool;

/// Provides read access to scraper execution history.
pub struct ScrapeRunRepo;

impl ScrapeRunRepo {
    /// Fraction of runs started at or after `since` that succeeded.
    ///
    /// Returns `None` when no run was started in the window.
    pub async fn success_rate_since(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<Option<f64>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<f64>>(
            "SELECT COUNT(*) FILTER (WHERE succeeded)::FLOAT8 \
                    / NULLIF(COUNT(*), 0)::FLOAT8 \
             FROM scrape_runs \
             WHERE started_at >= $1",
        )
        .bind(since)
        .fetch_one(pool)
        .await
    }
}
