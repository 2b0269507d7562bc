//! System status and advisory insight types.

use serde::{Deserialize, Serialize};

use crate::freshness::FreshnessState;
use crate::types::{DbId, Timestamp};

/// Window used for the scraping success rate.
pub const SUCCESS_RATE_WINDOW_DAYS: i64 = 30;

/// Raw counts read from the record store.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecordCounts {
    pub total_wards: i64,
    pub total_hospitals: i64,
    pub last_scraped_at: Option<Timestamp>,
}

/// Payload of `GET /status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub is_stale: bool,
    pub last_scrape_time: Option<Timestamp>,
    pub hours_since_last_scrape: Option<f64>,
    pub total_wards: i64,
    pub total_hospitals: i64,
    /// Fraction of successful scrape runs over the last 30 days (0.0-1.0).
    /// `None` when no run was recorded in the window.
    pub scraping_success_rate_30d: Option<f64>,
}

impl SystemStatus {
    pub fn from_parts(
        counts: RecordCounts,
        freshness: FreshnessState,
        scraping_success_rate_30d: Option<f64>,
    ) -> Self {
        Self {
            is_stale: freshness.is_stale,
            last_scrape_time: counts.last_scraped_at,
            hours_since_last_scrape: counts
                .last_scraped_at
                .map(|_| freshness.hours_since_last_scrape),
            total_wards: counts.total_wards,
            total_hospitals: counts.total_hospitals,
            scraping_success_rate_30d,
        }
    }

    /// "No data" answer used when the backend cannot be read.
    pub fn unavailable() -> Self {
        Self {
            is_stale: false,
            last_scrape_time: None,
            hours_since_last_scrape: None,
            total_wards: 0,
            total_hospitals: 0,
            scraping_success_rate_30d: None,
        }
    }
}

/// One scraper execution, written by the external scraper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRun {
    pub id: DbId,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub succeeded: bool,
    pub rows_written: i32,
    pub error_message: Option<String>,
}

/// Severity of an advisory insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSeverity {
    Info,
    Warning,
    Critical,
}

impl InsightSeverity {
    pub fn from_str_value(s: &str) -> Option<Self> {
        match s {
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// An advisory message shown to users while it is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: DbId,
    pub title: String,
    pub body: String,
    pub severity: InsightSeverity,
    pub active_from: Timestamp,
    pub active_until: Option<Timestamp>,
}

impl Insight {
    /// Whether the insight should be shown at `now`.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.active_from <= now && self.active_until.map_or(true, |until| now < until)
    }
}

/// Success fraction of `runs` started at or after `since`.
pub fn success_rate(runs: &[ScrapeRun], since: Timestamp) -> Option<f64> {
    let (total, succeeded) = runs
        .iter()
        .filter(|r| r.started_at >= since)
        .fold((0u32, 0u32), |(total, ok), r| (total + 1, ok + u32::from(r.succeeded)));

    (total > 0).then(|| f64::from(succeeded) / f64::from(total))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::freshness::evaluate;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap()
    }

    fn run(days_ago: i64, succeeded: bool) -> ScrapeRun {
        ScrapeRun {
            id: 0,
            started_at: now() - Duration::days(days_ago),
            finished_at: None,
            succeeded,
            rows_written: 0,
            error_message: None,
        }
    }

    #[test]
    fn success_rate_counts_only_window() {
        let runs = vec![run(1, true), run(2, false), run(3, true), run(40, false)];
        let rate = success_rate(&runs, now() - Duration::days(30)).unwrap();
        assert!((rate - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn success_rate_is_none_without_runs() {
        assert_eq!(success_rate(&[run(45, true)], now() - Duration::days(30)), None);
    }

    #[test]
    fn status_without_scrapes_reports_stale_and_no_hours() {
        let status = SystemStatus::from_parts(RecordCounts::default(), evaluate(None, now()), None);
        assert!(status.is_stale);
        assert_eq!(status.hours_since_last_scrape, None);
        assert_eq!(status.last_scrape_time, None);
    }

    #[test]
    fn unavailable_status_is_not_stale() {
        let status = SystemStatus::unavailable();
        assert!(!status.is_stale);
        assert_eq!(status.total_wards, 0);
    }

    #[test]
    fn insight_activity_window() {
        let insight = Insight {
            id: 1,
            title: "t".into(),
            body: "b".into(),
            severity: InsightSeverity::Info,
            active_from: now() - Duration::hours(1),
            active_until: Some(now() + Duration::hours(1)),
        };
        assert!(insight.is_active_at(now()));
        assert!(!insight.is_active_at(now() + Duration::hours(2)));
        assert!(!insight.is_active_at(now() - Duration::hours(2)));
    }
}
