//! Data freshness (staleness) evaluation.
//!
//! Freshness is derived from the most recent scrape timestamp across all
//! records. The evaluation is a pure function of that timestamp and a clock
//! reading supplied by the caller.

use chrono::Duration;
use serde::Serialize;

use crate::types::Timestamp;

/// Data older than this many hours is stale. Exactly 12 hours is not.
pub const STALE_THRESHOLD_HOURS: i64 = 12;

/// Hours reported when no scrape has ever been recorded (one year).
pub const UNKNOWN_SCRAPE_HOURS: f64 = 8760.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Derived freshness of the scraped data set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreshnessState {
    pub last_scraped_at: Option<Timestamp>,
    pub hours_since_last_scrape: f64,
    pub is_stale: bool,
}

/// Staleness evaluator with a configurable "never scraped" sentinel.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessMonitor {
    threshold: Duration,
    unknown_hours: f64,
}

impl Default for FreshnessMonitor {
    fn default() -> Self {
        Self {
            threshold: Duration::hours(STALE_THRESHOLD_HOURS),
            unknown_hours: UNKNOWN_SCRAPE_HOURS,
        }
    }
}

impl FreshnessMonitor {
    /// Use `unknown_hours` instead of [`UNKNOWN_SCRAPE_HOURS`] when there is no
    /// scrape timestamp. Negative values are clamped to zero.
    pub fn with_unknown_hours(unknown_hours: f64) -> Self {
        Self {
            unknown_hours: unknown_hours.max(0.0),
            ..Self::default()
        }
    }

    /// Evaluate freshness of `last_scraped_at` as observed at `now`.
    ///
    /// A missing timestamp is the least fresh state: stale, with the unknown
    /// sentinel as elapsed hours. A timestamp in the future (clock skew) counts
    /// as zero hours old.
    pub fn evaluate(&self, last_scraped_at: Option<Timestamp>, now: Timestamp) -> FreshnessState {
        let Some(scraped_at) = last_scraped_at else {
            return FreshnessState {
                last_scraped_at: None,
                hours_since_last_scrape: self.unknown_hours,
                is_stale: true,
            };
        };

        let elapsed = (now - scraped_at).max(Duration::zero());
        FreshnessState {
            last_scraped_at: Some(scraped_at),
            hours_since_last_scrape: elapsed.num_milliseconds() as f64 / MILLIS_PER_HOUR,
            is_stale: elapsed > self.threshold,
        }
    }
}

/// Evaluate with the default monitor.
pub fn evaluate(last_scraped_at: Option<Timestamp>, now: Timestamp) -> FreshnessState {
    FreshnessMonitor::default().evaluate(last_scraped_at, now)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 5, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn thirteen_hours_is_stale() {
        let state = evaluate(Some(now() - Duration::hours(13)), now());
        assert!(state.is_stale);
        assert!((state.hours_since_last_scrape - 13.0).abs() < 1e-9);
    }

    #[test]
    fn eleven_hours_is_fresh() {
        let state = evaluate(Some(now() - Duration::hours(11)), now());
        assert!(!state.is_stale);
        assert!((state.hours_since_last_scrape - 11.0).abs() < 1e-9);
    }

    #[test]
    fn exactly_twelve_hours_is_not_stale() {
        let state = evaluate(Some(now() - Duration::hours(12)), now());
        assert!(!state.is_stale);
        assert!((state.hours_since_last_scrape - 12.0).abs() < 1e-9);
    }

    #[test]
    fn one_millisecond_past_threshold_is_stale() {
        let scraped = now() - Duration::hours(12) - Duration::milliseconds(1);
        assert!(evaluate(Some(scraped), now()).is_stale);
    }

    #[test]
    fn missing_timestamp_is_stale_with_sentinel_hours() {
        let state = evaluate(None, now());
        assert!(state.is_stale);
        assert_eq!(state.last_scraped_at, None);
        assert_eq!(state.hours_since_last_scrape, UNKNOWN_SCRAPE_HOURS);
    }

    #[test]
    fn caller_supplied_sentinel_is_used() {
        let state = FreshnessMonitor::with_unknown_hours(48.0).evaluate(None, now());
        assert_eq!(state.hours_since_last_scrape, 48.0);
    }

    #[test]
    fn future_timestamp_clamps_to_zero_hours() {
        let state = evaluate(Some(now() + Duration::minutes(30)), now());
        assert!(!state.is_stale);
        assert_eq!(state.hours_since_last_scrape, 0.0);
    }
}
