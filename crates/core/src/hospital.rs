//! Scraped per-hospital ward observations.

use serde::{Deserialize, Serialize};

use crate::availability::parse_available_places;
use crate::types::{DbId, Timestamp};

/// One scraped observation of a ward in a specific hospital.
///
/// Rows are written wholesale by the external scraper and never edited by
/// this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalWardRecord {
    #[serde(default)]
    pub id: DbId,
    pub ward_name: String,
    pub hospital_name: String,
    pub district: Option<String>,
    /// Raw text as shown by the source page.
    pub available_places: String,
    pub ward_link: Option<String>,
    /// When the scraper observed the row. Authoritative for freshness.
    pub scraped_at: Timestamp,
    /// "Last updated" text reported by the source. Unreliable, display only.
    pub source_updated_text: Option<String>,
}

impl HospitalWardRecord {
    /// Numeric availability derived from the raw text.
    pub fn parsed_places(&self) -> i32 {
        parse_available_places(&self.available_places)
    }
}
