//! Storage capabilities the service layer is written against.
//!
//! The persistence engine is treated as an aggregate-function backend reached
//! through a narrow contract. Any engine implementing these traits satisfies
//! the service: `bedwatch-db` provides the PostgreSQL one, [`crate::memory`]
//! an in-process one.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::favorite::{Favorite, FavoriteWithStats};
use crate::hospital::HospitalWardRecord;
use crate::query::{HospitalQuery, Page, PageRequest};
use crate::status::{Insight, RecordCounts};
use crate::types::{Timestamp, UserId};
use crate::ward::{WardAggregate, WardFilter};

/// Failure reported by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// A uniqueness rule rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend could not run the query.
    #[error("Query failed: {0}")]
    Query(String),
}

/// Ward aggregation and raw record access.
#[async_trait]
pub trait AggregationBackend: Send + Sync {
    /// Aggregate wards matching `filter`, sorted by total places descending
    /// and ward name ascending.
    async fn aggregate_wards(&self, filter: &WardFilter)
        -> Result<Vec<WardAggregate>, BackendError>;

    /// Whether any record carries exactly this ward name.
    async fn ward_exists(&self, ward_name: &str) -> Result<bool, BackendError>;

    /// Records of one ward, filtered, ordered and paginated per `query`.
    async fn hospitals_in_ward(
        &self,
        ward_name: &str,
        query: &HospitalQuery,
    ) -> Result<Page<HospitalWardRecord>, BackendError>;

    /// Maximum scrape timestamp across all records.
    async fn latest_scrape_time(&self) -> Result<Option<Timestamp>, BackendError>;
}

/// Per-user favorite membership store.
#[async_trait]
pub trait FavoritesBackend: Send + Sync {
    /// Create the (user, ward) pair. An existing pair is a
    /// [`BackendError::Conflict`].
    async fn add_favorite(&self, user_id: UserId, ward_name: &str)
        -> Result<Favorite, BackendError>;

    /// Remove the pair. Returns `false` when it did not exist.
    async fn remove_favorite(&self, user_id: UserId, ward_name: &str)
        -> Result<bool, BackendError>;

    async fn favorite_ward_names(&self, user_id: UserId) -> Result<HashSet<String>, BackendError>;

    /// Favorites joined with current ward figures, newest first.
    async fn list_favorites(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<FavoriteWithStats>, BackendError>;

    /// Delete favorites whose ward no longer appears in the records.
    ///
    /// Does nothing while the record set is empty. Returns the number of
    /// deleted favorites.
    async fn purge_orphaned_favorites(&self) -> Result<u64, BackendError>;
}

/// Advisory reads backing `/status` and `/insights`.
#[async_trait]
pub trait StatusBackend: Send + Sync {
    /// Cheap reachability probe.
    async fn ping(&self) -> Result<(), BackendError>;

    async fn record_counts(&self) -> Result<RecordCounts, BackendError>;

    /// Success fraction of scrape runs started at or after `since`.
    async fn scraping_success_rate(&self, since: Timestamp) -> Result<Option<f64>, BackendError>;

    /// Most recently started insight active at `now`.
    async fn current_insight(&self, now: Timestamp) -> Result<Option<Insight>, BackendError>;
}

/// Everything the HTTP service needs from storage.
pub trait Backend: AggregationBackend + FavoritesBackend + StatusBackend {}

impl<T: AggregationBackend + FavoritesBackend + StatusBackend> Backend for T {}
