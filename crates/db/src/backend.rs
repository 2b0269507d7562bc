//! [`PgBackend`]: the backend traits of `bedwatch-core` over PostgreSQL.

use std::collections::HashSet;

use async_trait::async_trait;
use bedwatch_core::backend::{AggregationBackend, BackendError, FavoritesBackend, StatusBackend};
use bedwatch_core::favorite::{Favorite, FavoriteWithStats};
use bedwatch_core::hospital::HospitalWardRecord;
use bedwatch_core::query::{HospitalQuery, Page, PageRequest};
use bedwatch_core::status::{Insight, RecordCounts};
use bedwatch_core::types::{Timestamp, UserId};
use bedwatch_core::ward::{WardAggregate, WardFilter};

use crate::error::classify;
use crate::repositories::{FavoriteRepo, HospitalWardRepo, InsightRepo, ScrapeRunRepo};
use crate::DbPool;

/// Backend reading and writing through a PostgreSQL pool.
#[derive(Clone)]
pub struct PgBackend {
    pool: DbPool,
}

impl PgBackend {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl AggregationBackend for PgBackend {
    async fn aggregate_wards(
        &self,
        filter: &WardFilter,
    ) -> Result<Vec<WardAggregate>, BackendError> {
        let rows = HospitalWardRepo::aggregate_wards(
            &self.pool,
            filter.search.as_deref(),
            filter.user_id,
            filter.favorites_only,
        )
        .await
        .map_err(classify)?;
        Ok(rows.into_iter().map(WardAggregate::from).collect())
    }

    async fn ward_exists(&self, ward_name: &str) -> Result<bool, BackendError> {
        HospitalWardRepo::ward_exists(&self.pool, ward_name)
            .await
            .map_err(classify)
    }

    async fn hospitals_in_ward(
        &self,
        ward_name: &str,
        query: &HospitalQuery,
    ) -> Result<Page<HospitalWardRecord>, BackendError> {
        let rows = HospitalWardRepo::list_in_ward(&self.pool, ward_name, query)
            .await
            .map_err(classify)?;
        let total = HospitalWardRepo::count_in_ward(&self.pool, ward_name, query)
            .await
            .map_err(classify)?;

        Ok(Page {
            items: rows.into_iter().map(HospitalWardRecord::from).collect(),
            total,
        })
    }

    async fn latest_scrape_time(&self) -> Result<Option<Timestamp>, BackendError> {
        HospitalWardRepo::latest_scrape_time(&self.pool)
            .await
            .map_err(classify)
    }
}

#[async_trait]
impl FavoritesBackend for PgBackend {
    async fn add_favorite(
        &self,
        user_id: UserId,
        ward_name: &str,
    ) -> Result<Favorite, BackendError> {
        let row = FavoriteRepo::create(&self.pool, user_id, ward_name)
            .await
            .map_err(classify)?;
        Ok(row.into())
    }

    async fn remove_favorite(
        &self,
        user_id: UserId,
        ward_name: &str,
    ) -> Result<bool, BackendError> {
        FavoriteRepo::delete_by_ward(&self.pool, user_id, ward_name)
            .await
            .map_err(classify)
    }

    async fn favorite_ward_names(&self, user_id: UserId) -> Result<HashSet<String>, BackendError> {
        let names = FavoriteRepo::ward_names(&self.pool, user_id)
            .await
            .map_err(classify)?;
        Ok(names.into_iter().collect())
    }

    async fn list_favorites(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<FavoriteWithStats>, BackendError> {
        let rows = FavoriteRepo::list_with_stats(&self.pool, user_id, page)
            .await
            .map_err(classify)?;
        let total = FavoriteRepo::count_for_user(&self.pool, user_id)
            .await
            .map_err(classify)?;

        Ok(Page {
            items: rows.into_iter().map(FavoriteWithStats::from).collect(),
            total,
        })
    }

    async fn purge_orphaned_favorites(&self) -> Result<u64, BackendError> {
        FavoriteRepo::delete_orphaned(&self.pool)
            .await
            .map_err(classify)
    }
}

#[async_trait]
impl StatusBackend for PgBackend {
    async fn ping(&self) -> Result<(), BackendError> {
        crate::health_check(&self.pool).await.map_err(classify)
    }

    async fn record_counts(&self) -> Result<RecordCounts, BackendError> {
        let row = HospitalWardRepo::record_counts(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.into())
    }

    async fn scraping_success_rate(&self, since: Timestamp) -> Result<Option<f64>, BackendError> {
        ScrapeRunRepo::success_rate_since(&self.pool, since)
            .await
            .map_err(classify)
    }

    async fn current_insight(&self, now: Timestamp) -> Result<Option<Insight>, BackendError> {
        let row = InsightRepo::find_current(&self.pool, now)
            .await
            .map_err(classify)?;
        row.map(Insight::try_from)
            .transpose()
            .map_err(BackendError::Query)
    }
}
