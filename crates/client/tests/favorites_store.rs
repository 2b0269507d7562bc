//! Tests for the optimistic favorites protocol against a scripted remote.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use async_trait::async_trait;
use tokio::sync::Notify;

use bedwatch_client::favorites::{FavoritesStore, ToggleError, ToggleOutcome};
use bedwatch_client::notify::FavoriteNotice;
use bedwatch_client::remote::{FavoritesRemote, RemoteError};

// ---------------------------------------------------------------------------
// Scripted remote
// ---------------------------------------------------------------------------

/// Remote that succeeds unless told otherwise. Calls for a held ward wait
/// until the returned `Notify` is signalled.
#[derive(Default)]
struct ScriptedRemote {
    initial: HashSet<String>,
    failures: HashMap<String, RemoteError>,
    gates: HashMap<String, Arc<Notify>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRemote {
    fn with_favorites(names: &[&str]) -> Self {
        Self {
            initial: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    fn fail(mut self, ward: &str, err: RemoteError) -> Self {
        self.failures.insert(ward.to_string(), err);
        self
    }

    fn hold(mut self, ward: &str) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gates.insert(ward.to_string(), gate.clone());
        (self, gate)
    }

    async fn answer(&self, op: &str, ward: &str) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(format!("{op} {ward}"));
        if let Some(gate) = self.gates.get(ward) {
            gate.notified().await;
        }
        match self.failures.get(ward) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FavoritesRemote for ScriptedRemote {
    async fn add_favorite(&self, ward_name: &str) -> Result<(), RemoteError> {
        self.answer("add", ward_name).await
    }

    async fn remove_favorite(&self, ward_name: &str) -> Result<(), RemoteError> {
        self.answer("remove", ward_name).await
    }

    async fn favorite_ward_names(&self) -> Result<HashSet<String>, RemoteError> {
        Ok(self.initial.clone())
    }
}

async fn store_over(remote: ScriptedRemote) -> (Arc<FavoritesStore>, Arc<ScriptedRemote>) {
    let remote = Arc::new(remote);
    let store = FavoritesStore::load(remote.clone()).await.unwrap();
    (Arc::new(store), remote)
}

async fn wait_until_pending(store: &FavoritesStore, ward: &str) {
    while !store.is_pending(ward) {
        tokio::task::yield_now().await;
    }
}

// ---------------------------------------------------------------------------
// Settled toggles
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_then_remove_round_trips() {
    let (store, remote) = store_over(ScriptedRemote::default()).await;
    let mut notices = store.subscribe();

    assert_eq!(store.toggle("Kardiologia").await.unwrap(), ToggleOutcome::Added);
    assert!(store.contains("Kardiologia"));
    assert_eq!(store.toggle("Kardiologia").await.unwrap(), ToggleOutcome::Removed);
    assert!(!store.contains("Kardiologia"));
    assert!(!store.is_pending("Kardiologia"));

    assert_eq!(
        *remote.calls.lock().unwrap(),
        vec!["add Kardiologia", "remove Kardiologia"]
    );
    assert_matches!(notices.recv().await.unwrap(), FavoriteNotice::Added { .. });
    assert_matches!(notices.recv().await.unwrap(), FavoriteNotice::Removed { .. });
}

#[tokio::test]
async fn load_starts_from_server_state() {
    let (store, _) = store_over(ScriptedRemote::with_favorites(&["Neurologia", "Kardiologia"])).await;

    assert_eq!(store.favorites(), vec!["Kardiologia", "Neurologia"]);
}

#[tokio::test]
async fn failed_add_rolls_back_and_reports_server_message() {
    let remote = ScriptedRemote::default().fail(
        "Kardiologia",
        RemoteError::Server {
            status: 500,
            message: "A database error occurred".into(),
        },
    );
    let (store, _) = store_over(remote).await;
    let mut notices = store.subscribe();

    let err = store.toggle("Kardiologia").await.unwrap_err();

    assert_matches!(err, ToggleError::Remote { source: RemoteError::Server { status: 500, .. }, .. });
    assert!(!store.contains("Kardiologia"));
    assert!(!store.is_pending("Kardiologia"));
    assert_eq!(
        notices.recv().await.unwrap(),
        FavoriteNotice::Failed {
            ward_name: "Kardiologia".into(),
            message: "A database error occurred".into(),
        }
    );
}

#[tokio::test]
async fn failed_remove_restores_membership() {
    let remote = ScriptedRemote::with_favorites(&["Okulistyka"])
        .fail("Okulistyka", RemoteError::Transport("connection reset".into()));
    let (store, _) = store_over(remote).await;

    assert_matches!(store.toggle("Okulistyka").await, Err(ToggleError::Remote { .. }));
    assert!(store.contains("Okulistyka"));
}

#[tokio::test]
async fn conflict_on_add_means_already_favorited() {
    let remote = ScriptedRemote::default().fail(
        "Kardiologia",
        RemoteError::Conflict("Ward 'Kardiologia' is already in favorites".into()),
    );
    let (store, _) = store_over(remote).await;

    assert_eq!(
        store.toggle("Kardiologia").await.unwrap(),
        ToggleOutcome::AlreadyFavorited
    );
    assert!(store.contains("Kardiologia"));
}

#[tokio::test]
async fn not_found_on_remove_means_already_absent() {
    let remote = ScriptedRemote::with_favorites(&["Neurologia"])
        .fail("Neurologia", RemoteError::NotFound("Favorite 'Neurologia' not found".into()));
    let (store, _) = store_over(remote).await;

    assert_eq!(
        store.toggle("Neurologia").await.unwrap(),
        ToggleOutcome::AlreadyAbsent
    );
    assert!(!store.contains("Neurologia"));
}

#[tokio::test]
async fn not_found_on_add_is_a_failure() {
    let remote = ScriptedRemote::default()
        .fail("Neurologia", RemoteError::NotFound("gone".into()));
    let (store, _) = store_over(remote).await;

    assert_matches!(store.toggle("Neurologia").await, Err(ToggleError::Remote { .. }));
    assert!(!store.contains("Neurologia"));
}

// ---------------------------------------------------------------------------
// In-flight behaviour
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pending_ward_rejects_second_toggle_while_others_proceed() {
    let (remote, gate) = ScriptedRemote::default().hold("Kardiologia");
    let (store, remote) = store_over(remote).await;

    let first = tokio::spawn({
        let store = store.clone();
        async move { store.toggle("Kardiologia").await }
    });
    wait_until_pending(&store, "Kardiologia").await;

    // Optimistic state is visible while the call is in flight.
    assert!(store.contains("Kardiologia"));
    assert_matches!(
        store.toggle("Kardiologia").await,
        Err(ToggleError::Pending(ward)) if ward == "Kardiologia"
    );

    // Another ward is not blocked by the pending one.
    assert_eq!(store.toggle("Neurologia").await.unwrap(), ToggleOutcome::Added);
    assert!(store.is_pending("Kardiologia"));

    gate.notify_one();
    assert_eq!(first.await.unwrap().unwrap(), ToggleOutcome::Added);
    assert!(!store.is_pending("Kardiologia"));
    assert_eq!(store.favorites(), vec!["Kardiologia", "Neurologia"]);

    // The rejected toggle never reached the remote.
    let calls = remote.calls.lock().unwrap().clone();
    assert_eq!(calls.iter().filter(|c| c.as_str() == "add Kardiologia").count(), 1);
}

#[tokio::test]
async fn rollback_of_one_ward_keeps_concurrent_change_to_another() {
    let (remote, gate) = ScriptedRemote::default()
        .fail("Kardiologia", RemoteError::Transport("timeout".into()))
        .hold("Kardiologia");
    let (store, _) = store_over(remote).await;

    let failing = tokio::spawn({
        let store = store.clone();
        async move { store.toggle("Kardiologia").await }
    });
    wait_until_pending(&store, "Kardiologia").await;

    store.toggle("Neurologia").await.unwrap();
    gate.notify_one();
    assert!(failing.await.unwrap().is_err());

    assert_eq!(store.favorites(), vec!["Neurologia"]);
}

#[tokio::test]
async fn dropped_toggle_restores_ward_and_clears_pending() {
    let (remote, _gate) = ScriptedRemote::default().hold("Kardiologia");
    let (store, _) = store_over(remote).await;

    let handle = tokio::spawn({
        let store = store.clone();
        async move { store.toggle("Kardiologia").await }
    });
    wait_until_pending(&store, "Kardiologia").await;

    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());

    assert!(!store.contains("Kardiologia"));
    assert!(!store.is_pending("Kardiologia"));
}

#[tokio::test]
async fn clear_detaches_in_flight_toggles() {
    let (remote, gate) = ScriptedRemote::with_favorites(&["Okulistyka"]).hold("Kardiologia");
    let (store, _) = store_over(remote).await;

    let handle = tokio::spawn({
        let store = store.clone();
        async move { store.toggle("Kardiologia").await }
    });
    wait_until_pending(&store, "Kardiologia").await;

    store.clear();
    assert!(store.favorites().is_empty());
    assert!(!store.is_pending("Kardiologia"));

    gate.notify_one();
    handle.await.unwrap().unwrap();

    assert!(store.favorites().is_empty());
}
