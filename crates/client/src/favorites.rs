//! Optimistic, per-ward-guarded favorites cache.
//!
//! [`FavoritesStore::toggle`] flips a ward locally before the server has
//! answered, so the UI reflects the user's intent at once. The remote call
//! is the only suspension point. While it is in flight the ward is
//! *pending*: a second toggle of the same ward is rejected, other wards stay
//! freely mutable. When the call settles the ward is either kept (success,
//! or a conflict / not-found that already matches the intent) or restored to
//! its pre-toggle membership.
//!
//! The state lock is a `std::sync::Mutex` that is never held across an
//! `.await`.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::notify::{FavoriteNotice, Notifier};
use crate::remote::{FavoritesRemote, RemoteError};

/// How a successful toggle settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// The server already had the ward as a favorite (`409`).
    AlreadyFavorited,
    /// The server did not have the ward as a favorite (`404`).
    AlreadyAbsent,
}

#[derive(Debug, thiserror::Error)]
pub enum ToggleError {
    /// A mutation of this ward is already in flight.
    #[error("Ward '{0}' has a pending change")]
    Pending(String),

    /// The remote call failed; the ward was restored.
    #[error("Toggling ward '{ward_name}' failed: {source}")]
    Remote {
        ward_name: String,
        #[source]
        source: RemoteError,
    },
}

#[derive(Default)]
struct State {
    favorites: HashSet<String>,
    pending: HashSet<String>,
    /// Bumped by [`FavoritesStore::clear`]; in-flight toggles of an older
    /// session leave the state alone when they settle.
    session: u64,
}

/// Client-side set of the user's favorite wards.
///
/// Construct one per signed-in session and share it behind an [`Arc`].
pub struct FavoritesStore {
    remote: Arc<dyn FavoritesRemote>,
    state: Mutex<State>,
    notices: Notifier,
}

impl FavoritesStore {
    /// Empty store; use [`load`](Self::load) to start from server state.
    pub fn new(remote: Arc<dyn FavoritesRemote>) -> Self {
        Self {
            remote,
            state: Mutex::new(State::default()),
            notices: Notifier::default(),
        }
    }

    /// Store seeded with the server's current favorites.
    pub async fn load(remote: Arc<dyn FavoritesRemote>) -> Result<Self, RemoteError> {
        let favorites = remote.favorite_ward_names().await?;
        let store = Self::new(remote);
        store.lock().favorites = favorites;
        Ok(store)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn contains(&self, ward_name: &str) -> bool {
        self.lock().favorites.contains(ward_name)
    }

    pub fn is_pending(&self, ward_name: &str) -> bool {
        self.lock().pending.contains(ward_name)
    }

    /// Snapshot of the favorite ward names, sorted.
    pub fn favorites(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().favorites.iter().cloned().collect();
        names.sort();
        names
    }

    /// Receive a notice each time a toggle settles.
    pub fn subscribe(&self) -> broadcast::Receiver<FavoriteNotice> {
        self.notices.subscribe()
    }

    /// Forget everything, e.g. on sign-out.
    ///
    /// Toggles still in flight settle without touching the cleared state.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.favorites.clear();
        state.pending.clear();
        state.session += 1;
    }

    /// Flip the favorite membership of `ward_name`.
    ///
    /// Dropping the returned future before it completes restores the ward
    /// and clears its pending mark; the server may still apply the request,
    /// which the next [`load`](Self::load) reconciles.
    pub async fn toggle(&self, ward_name: &str) -> Result<ToggleOutcome, ToggleError> {
        let mut guard = self.begin(ward_name)?;
        let adding = !guard.was_favorite;

        let result = if adding {
            self.remote.add_favorite(ward_name).await
        } else {
            self.remote.remove_favorite(ward_name).await
        };

        let outcome = match (adding, result) {
            (true, Ok(())) => ToggleOutcome::Added,
            (false, Ok(())) => ToggleOutcome::Removed,
            (true, Err(RemoteError::Conflict(_))) => ToggleOutcome::AlreadyFavorited,
            (false, Err(RemoteError::NotFound(_))) => ToggleOutcome::AlreadyAbsent,
            (_, Err(source)) => {
                // Dropping the unsettled guard restores the pre-image.
                drop(guard);
                tracing::warn!(ward_name, error = %source, "Favorite toggle rolled back");
                self.notices.publish(FavoriteNotice::Failed {
                    ward_name: ward_name.to_string(),
                    message: source.user_message(),
                });
                return Err(ToggleError::Remote {
                    ward_name: ward_name.to_string(),
                    source,
                });
            }
        };

        guard.settle();
        drop(guard);

        tracing::debug!(ward_name, ?outcome, "Favorite toggle settled");
        self.notices.publish(if adding {
            FavoriteNotice::Added {
                ward_name: ward_name.to_string(),
            }
        } else {
            FavoriteNotice::Removed {
                ward_name: ward_name.to_string(),
            }
        });
        Ok(outcome)
    }

    /// Check the per-ward guard, apply the flip and mark the ward pending.
    fn begin<'a>(&'a self, ward_name: &'a str) -> Result<PendingGuard<'a>, ToggleError> {
        let mut state = self.lock();
        if state.pending.contains(ward_name) {
            return Err(ToggleError::Pending(ward_name.to_string()));
        }

        let was_favorite = state.favorites.contains(ward_name);
        if was_favorite {
            state.favorites.remove(ward_name);
        } else {
            state.favorites.insert(ward_name.to_string());
        }
        state.pending.insert(ward_name.to_string());

        Ok(PendingGuard {
            store: self,
            ward_name,
            was_favorite,
            session: state.session,
            settled: false,
        })
    }
}

/// Marks a ward pending for as long as it lives.
///
/// On drop the pending mark is cleared; unless [`settle`](Self::settle) was
/// called the ward's membership is also restored to `was_favorite`. Both
/// happen under one lock.
struct PendingGuard<'a> {
    store: &'a FavoritesStore,
    ward_name: &'a str,
    was_favorite: bool,
    session: u64,
    settled: bool,
}

impl PendingGuard<'_> {
    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.store.lock();
        if state.session != self.session {
            return;
        }
        if !self.settled {
            if self.was_favorite {
                state.favorites.insert(self.ward_name.to_string());
            } else {
                state.favorites.remove(self.ward_name);
            }
        }
        state.pending.remove(self.ward_name);
    }
}
