//! Debounced ward search with out-of-order response protection.
//!
//! Every keystroke calls [`WardSearch::search`]. A call waits
//! [`DEBOUNCE_INTERVAL`] and gives up if a newer call arrived meanwhile.
//! Calls that do reach the server can still answer out of order, so each
//! carries a [`SearchTicket`] and a response is only applied when its ticket
//! is newer than the last applied one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bedwatch_core::ward::WardAggregate;

use crate::remote::{RemoteError, WardSource};

/// Quiet period after the last keystroke before a search is sent.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(300);

/// Sequence number of one issued search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

/// Issues monotonically increasing tickets and remembers the newest applied.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> SearchTicket {
        SearchTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no ticket was issued after `ticket`.
    pub fn is_latest(&self, ticket: SearchTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Record `ticket` as applied if it is newer than every applied ticket.
    ///
    /// Returns `false` when the response must be discarded.
    pub fn try_apply(&self, ticket: SearchTicket) -> bool {
        self.applied.fetch_max(ticket.0, Ordering::SeqCst) < ticket.0
    }
}

/// Debounced, sequenced ward search for one search box.
pub struct WardSearch {
    source: Arc<dyn WardSource>,
    sequencer: SearchSequencer,
    debounce: Duration,
}

impl WardSearch {
    pub fn new(source: Arc<dyn WardSource>) -> Self {
        Self::with_debounce(source, DEBOUNCE_INTERVAL)
    }

    pub fn with_debounce(source: Arc<dyn WardSource>, debounce: Duration) -> Self {
        Self {
            source,
            sequencer: SearchSequencer::new(),
            debounce,
        }
    }

    /// Search for `text`, returning the wards to render.
    ///
    /// `Ok(None)` means this call was superseded, either during the debounce
    /// or because a newer response was applied first; the caller keeps what
    /// it shows. Blank text lists all wards.
    pub async fn search(&self, text: &str) -> Result<Option<Vec<WardAggregate>>, RemoteError> {
        let ticket = self.sequencer.issue();

        tokio::time::sleep(self.debounce).await;
        if !self.sequencer.is_latest(ticket) {
            return Ok(None);
        }

        let text = text.trim();
        let search = (!text.is_empty()).then_some(text);
        let wards = self.source.search_wards(search).await?;

        if self.sequencer.try_apply(ticket) {
            Ok(Some(wards))
        } else {
            tracing::debug!(?ticket, "Discarded out-of-order search response");
            Ok(None)
        }
    }
}
