//! Periodic removal of favorites whose ward vanished from the source data.
//!
//! Favorites reference wards by name only, so a ward renamed or dropped by
//! the source leaves dangling favorites behind. The purge is skipped by the
//! backend while the record table is empty, which happens mid-replacement.

use std::sync::Arc;
use std::time::Duration;

use bedwatch_core::backend::{Backend, FavoritesBackend};
use tokio_util::sync::CancellationToken;

/// Run the cleanup loop every `interval` until `cancel` is triggered.
///
/// The first pass runs immediately.
pub async fn run(backend: Arc<dyn Backend>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Favorite cleanup job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Favorite cleanup job stopping");
                break;
            }
            _ = ticker.tick() => {
                match backend.purge_orphaned_favorites().await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Favorite cleanup: purged orphaned favorites");
                    }
                    Ok(_) => tracing::debug!("Favorite cleanup: nothing to purge"),
                    Err(e) => {
                        tracing::error!(error = %e, "Favorite cleanup: purge failed");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bedwatch_core::hospital::HospitalWardRecord;
    use bedwatch_core::memory::MemoryBackend;
    use bedwatch_core::query::PageRequest;
    use bedwatch_core::types::UserId;
    use chrono::Utc;

    fn record(ward: &str) -> HospitalWardRecord {
        HospitalWardRecord {
            id: 0,
            ward_name: ward.to_string(),
            hospital_name: "Szpital A".to_string(),
            district: None,
            available_places: "3".to_string(),
            ward_link: None,
            scraped_at: Utc::now(),
            source_updated_text: None,
        }
    }

    #[tokio::test]
    async fn first_tick_purges_orphans_then_stops_on_cancel() {
        let memory = Arc::new(MemoryBackend::new());
        memory.replace_records(vec![record("Kardiologia")]).await;
        let user = UserId::new_v4();
        memory.add_favorite(user, "Kardiologia").await.unwrap();
        memory.add_favorite(user, "Pulmonologia").await.unwrap();

        let cancel = CancellationToken::new();
        let backend: Arc<dyn Backend> = memory.clone();
        let handle = tokio::spawn(run(backend, Duration::from_secs(3600), cancel.clone()));

        // The immediate first tick does the work; poll until it lands.
        for _ in 0..100 {
            let page = memory.list_favorites(user, PageRequest::default()).await.unwrap();
            if page.total == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        cancel.cancel();
        handle.await.unwrap();

        let page = memory.list_favorites(user, PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].ward_name, "Kardiologia");
    }
}
