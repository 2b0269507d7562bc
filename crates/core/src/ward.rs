//! Ward-level aggregation of hospital records.
//!
//! Rows are grouped by exact ward name. Each group reports how many distinct
//! hospitals offer the ward, the summed parsed availability, and the most
//! recent scrape time. Favorite status is relative to the requesting user.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::hospital::HospitalWardRecord;
use crate::types::{Timestamp, UserId};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Per-ward summary, recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardAggregate {
    pub ward_name: String,
    pub hospital_count: i64,
    pub total_places: i64,
    pub is_favorite: bool,
    pub last_scraped_at: Option<Timestamp>,
}

/// Filter handed to an aggregation backend.
#[derive(Debug, Clone, Default)]
pub struct WardFilter {
    /// Case-insensitive substring match on the ward name.
    pub search: Option<String>,
    /// User whose favorites drive `is_favorite`. `None` means no favorites.
    pub user_id: Option<UserId>,
    pub favorites_only: bool,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Group<'a> {
    hospitals: HashSet<&'a str>,
    total_places: i64,
    last_scraped_at: Option<Timestamp>,
}

/// Aggregate raw records into ward summaries.
///
/// Output is sorted by `total_places` descending, ties broken by ward name
/// ascending. An empty input yields an empty output.
pub fn aggregate(
    records: &[HospitalWardRecord],
    search: Option<&str>,
    favorite_ward_names: &HashSet<String>,
    favorites_only: bool,
) -> Vec<WardAggregate> {
    let needle = search.map(str::to_lowercase);

    let mut groups: BTreeMap<&str, Group<'_>> = BTreeMap::new();
    for record in records {
        if let Some(needle) = &needle {
            if !record.ward_name.to_lowercase().contains(needle.as_str()) {
                continue;
            }
        }

        let group = groups.entry(record.ward_name.as_str()).or_default();
        group.hospitals.insert(record.hospital_name.as_str());
        group.total_places += i64::from(record.parsed_places());
        group.last_scraped_at = group.last_scraped_at.max(Some(record.scraped_at));
    }

    let mut wards: Vec<WardAggregate> = groups
        .into_iter()
        .map(|(ward_name, group)| WardAggregate {
            ward_name: ward_name.to_string(),
            hospital_count: group.hospitals.len() as i64,
            total_places: group.total_places,
            is_favorite: favorite_ward_names.contains(ward_name),
            last_scraped_at: group.last_scraped_at,
        })
        .filter(|ward| !favorites_only || ward.is_favorite)
        .collect();

    sort_wards(&mut wards);
    wards
}

/// Canonical ward ordering: most places first, then ward name.
pub fn sort_wards(wards: &mut [WardAggregate]) {
    wards.sort_by(|a, b| {
        b.total_places
            .cmp(&a.total_places)
            .then_with(|| a.ward_name.cmp(&b.ward_name))
    });
}

/// Maximum scrape timestamp across all records, if any.
pub fn latest_scrape(records: &[HospitalWardRecord]) -> Option<Timestamp> {
    records.iter().map(|r| r.scraped_at).max()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
