//! User-facing notices about favorite mutations.

use tokio::sync::broadcast;

/// Default buffer capacity for the notice channel.
const DEFAULT_CAPACITY: usize = 64;

/// Result of a settled favorite toggle, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteNotice {
    /// The ward is now a favorite (or already was on the server).
    Added { ward_name: String },
    /// The ward is no longer a favorite (or already was not).
    Removed { ward_name: String },
    /// The mutation failed and the local state was rolled back.
    Failed { ward_name: String, message: String },
}

impl FavoriteNotice {
    pub fn ward_name(&self) -> &str {
        match self {
            Self::Added { ward_name } | Self::Removed { ward_name } => ward_name,
            Self::Failed { ward_name, .. } => ward_name,
        }
    }
}

/// Fan-out channel for [`FavoriteNotice`]s.
///
/// Publishing never blocks. Without subscribers a notice is dropped; a slow
/// subscriber observes `RecvError::Lagged` once the buffer overflows.
pub struct Notifier {
    sender: broadcast::Sender<FavoriteNotice>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, notice: FavoriteNotice) {
        // Err only means there are no receivers.
        let _ = self.sender.send(notice);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FavoriteNotice> {
        self.sender.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_receives_notices() {
        let notifier = Notifier::default();
        let mut a = notifier.subscribe();
        let mut b = notifier.subscribe();

        notifier.publish(FavoriteNotice::Added {
            ward_name: "Kardiologia".into(),
        });

        assert_eq!(a.recv().await.unwrap().ward_name(), "Kardiologia");
        assert_eq!(b.recv().await.unwrap().ward_name(), "Kardiologia");
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        Notifier::default().publish(FavoriteNotice::Removed {
            ward_name: "Neurologia".into(),
        });
    }
}
