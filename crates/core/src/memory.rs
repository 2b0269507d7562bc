//! In-process backend.
//!
//! Holds records, favorites, scrape runs and insights in memory and answers
//! every backend capability with the pure functions of this crate. Used for
//! local development (`BEDWATCH_BACKEND=memory`) and by HTTP tests that must
//! not depend on a database.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::backend::{AggregationBackend, BackendError, FavoritesBackend, StatusBackend};
use crate::favorite::{Favorite, FavoriteWithStats};
use crate::hospital::HospitalWardRecord;
use crate::query::{paginate, HospitalOrder, HospitalQuery, Page, PageRequest};
use crate::status::{success_rate, Insight, RecordCounts, ScrapeRun};
use crate::types::{DbId, Timestamp, UserId};
use crate::ward::{aggregate, latest_scrape, WardAggregate, WardFilter};

#[derive(Default)]
struct State {
    records: Vec<HospitalWardRecord>,
    favorites: HashMap<UserId, Vec<Favorite>>,
    scrape_runs: Vec<ScrapeRun>,
    insights: Vec<Insight>,
    next_id: DbId,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn favorite_names(&self, user_id: Option<UserId>) -> HashSet<String> {
        user_id
            .and_then(|id| self.favorites.get(&id))
            .map(|favs| favs.iter().map(|f| f.ward_name.clone()).collect())
            .unwrap_or_default()
    }
}

/// Backend keeping all data in process memory.
#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every record, the way a scrape cycle does.
    ///
    /// Record ids are reassigned.
    pub async fn replace_records(&self, records: Vec<HospitalWardRecord>) {
        let mut state = self.state.write().await;
        let mut records = records;
        for record in &mut records {
            record.id = state.next_id();
        }
        state.records = records;
    }

    pub async fn record_scrape_run(&self, mut run: ScrapeRun) {
        let mut state = self.state.write().await;
        run.id = state.next_id();
        state.scrape_runs.push(run);
    }

    pub async fn add_insight(&self, mut insight: Insight) {
        let mut state = self.state.write().await;
        insight.id = state.next_id();
        state.insights.push(insight);
    }
}

#[async_trait]
impl AggregationBackend for MemoryBackend {
    async fn aggregate_wards(
        &self,
        filter: &WardFilter,
    ) -> Result<Vec<WardAggregate>, BackendError> {
        let state = self.state.read().await;
        let favorites = state.favorite_names(filter.user_id);
        Ok(aggregate(
            &state.records,
            filter.search.as_deref(),
            &favorites,
            filter.favorites_only,
        ))
    }

    async fn ward_exists(&self, ward_name: &str) -> Result<bool, BackendError> {
        let state = self.state.read().await;
        Ok(state.records.iter().any(|r| r.ward_name == ward_name))
    }

    async fn hospitals_in_ward(
        &self,
        ward_name: &str,
        query: &HospitalQuery,
    ) -> Result<Page<HospitalWardRecord>, BackendError> {
        let state = self.state.read().await;
        let district = query.district.as_deref().map(str::to_lowercase);
        let search = query.search.as_deref().map(str::to_lowercase);

        let mut rows: Vec<HospitalWardRecord> = state
            .records
            .iter()
            .filter(|r| r.ward_name == ward_name)
            .filter(|r| match &district {
                Some(d) => r.district.as_deref().map(str::to_lowercase).as_ref() == Some(d),
                None => true,
            })
            .filter(|r| match &search {
                Some(s) => r.hospital_name.to_lowercase().contains(s.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        match query.order {
            HospitalOrder::AvailablePlacesDesc => rows.sort_by(|a, b| {
                b.parsed_places()
                    .cmp(&a.parsed_places())
                    .then_with(|| a.hospital_name.cmp(&b.hospital_name))
            }),
            HospitalOrder::HospitalNameAsc => rows.sort_by(|a, b| {
                a.hospital_name
                    .cmp(&b.hospital_name)
                    .then_with(|| a.id.cmp(&b.id))
            }),
        }

        Ok(paginate(rows, query.page))
    }

    async fn latest_scrape_time(&self) -> Result<Option<Timestamp>, BackendError> {
        Ok(latest_scrape(&self.state.read().await.records))
    }
}

#[async_trait]
impl FavoritesBackend for MemoryBackend {
    async fn add_favorite(
        &self,
        user_id: UserId,
        ward_name: &str,
    ) -> Result<Favorite, BackendError> {
        let mut state = self.state.write().await;
        let exists = state
            .favorites
            .get(&user_id)
            .is_some_and(|favs| favs.iter().any(|f| f.ward_name == ward_name));
        if exists {
            return Err(BackendError::Conflict(format!(
                "Ward '{ward_name}' is already a favorite"
            )));
        }

        let favorite = Favorite {
            id: state.next_id(),
            user_id,
            ward_name: ward_name.to_string(),
            created_at: Utc::now(),
        };
        state
            .favorites
            .entry(user_id)
            .or_default()
            .push(favorite.clone());
        Ok(favorite)
    }

    async fn remove_favorite(
        &self,
        user_id: UserId,
        ward_name: &str,
    ) -> Result<bool, BackendError> {
        let mut state = self.state.write().await;
        let Some(favs) = state.favorites.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = favs.len();
        favs.retain(|f| f.ward_name != ward_name);
        Ok(favs.len() < before)
    }

    async fn favorite_ward_names(&self, user_id: UserId) -> Result<HashSet<String>, BackendError> {
        Ok(self.state.read().await.favorite_names(Some(user_id)))
    }

    async fn list_favorites(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<FavoriteWithStats>, BackendError> {
        let state = self.state.read().await;
        let Some(favs) = state.favorites.get(&user_id) else {
            return Ok(Page::empty());
        };

        let all_names: HashSet<String> = favs.iter().map(|f| f.ward_name.clone()).collect();
        let stats: HashMap<String, WardAggregate> = aggregate(&state.records, None, &all_names, true)
            .into_iter()
            .map(|w| (w.ward_name.clone(), w))
            .collect();

        let mut rows: Vec<FavoriteWithStats> = favs
            .iter()
            .map(|f| {
                let ward = stats.get(&f.ward_name);
                FavoriteWithStats {
                    id: f.id,
                    ward_name: f.ward_name.clone(),
                    created_at: f.created_at,
                    hospital_count: ward.map_or(0, |w| w.hospital_count),
                    total_places: ward.map_or(0, |w| w.total_places),
                    last_scraped_at: ward.and_then(|w| w.last_scraped_at),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        Ok(paginate(rows, page))
    }

    async fn purge_orphaned_favorites(&self) -> Result<u64, BackendError> {
        let mut state = self.state.write().await;
        if state.records.is_empty() {
            return Ok(0);
        }

        let known: HashSet<String> = state.records.iter().map(|r| r.ward_name.clone()).collect();
        let mut deleted = 0u64;
        for favs in state.favorites.values_mut() {
            let before = favs.len();
            favs.retain(|f| known.contains(&f.ward_name));
            deleted += (before - favs.len()) as u64;
        }
        Ok(deleted)
    }
}

#[async_trait]
impl StatusBackend for MemoryBackend {
    async fn ping(&self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn record_counts(&self) -> Result<RecordCounts, BackendError> {
        let state = self.state.read().await;
        let wards: HashSet<&str> = state.records.iter().map(|r| r.ward_name.as_str()).collect();
        let hospitals: HashSet<&str> = state
            .records
            .iter()
            .map(|r| r.hospital_name.as_str())
            .collect();

        Ok(RecordCounts {
            total_wards: wards.len() as i64,
            total_hospitals: hospitals.len() as i64,
            last_scraped_at: latest_scrape(&state.records),
        })
    }

    async fn scraping_success_rate(&self, since: Timestamp) -> Result<Option<f64>, BackendError> {
        Ok(success_rate(&self.state.read().await.scrape_runs, since))
    }

    async fn current_insight(&self, now: Timestamp) -> Result<Option<Insight>, BackendError> {
        let state = self.state.read().await;
        Ok(state
            .insights
            .iter()
            .filter(|i| i.is_active_at(now))
            .max_by_key(|i| (i.active_from, i.id))
            .cloned())
    }
}
