//! Odds board state and refresh handling.
//!
//! Only the most-recently-issued refresh may ever touch visible state: every
//! refresh takes a sequence number, a superseded request stops waiting on the
//! network as soon as it notices a newer one, and the sequence is re-checked
//! at apply time so a late response is a no-op.

use crate::api::PicksApiClient;
use crate::models::{Game, Sport};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, warn};

/// Render state for the odds board
#[derive(Debug, Clone)]
pub struct FeedState {
    pub sport: Sport,
    pub games: Vec<Game>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            sport: Sport::Nfl,
            games: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

pub type SharedFeedState = Arc<RwLock<FeedState>>;

#[derive(Clone)]
pub struct OddsFeed {
    client: Arc<PicksApiClient>,
    state: SharedFeedState,
    issued: Arc<AtomicU64>,
    latest: Arc<watch::Sender<u64>>,
}

impl OddsFeed {
    pub fn new(client: Arc<PicksApiClient>) -> Self {
        let (latest, _) = watch::channel(0);
        Self {
            client,
            state: Arc::new(RwLock::new(FeedState::default())),
            issued: Arc::new(AtomicU64::new(0)),
            latest: Arc::new(latest),
        }
    }

    /// Handle other components may read the board through
    pub fn shared_state(&self) -> SharedFeedState {
        self.state.clone()
    }

    /// Owned copy of the current board for rendering
    pub async fn snapshot(&self) -> FeedState {
        self.state.read().await.clone()
    }

    /// Fetch the board for a sport and apply the result.
    ///
    /// Errors never escape: a failed fetch keeps the previous game list and
    /// sets the error banner instead. A refresh that has been superseded by a
    /// newer one applies nothing.
    pub async fn refresh(&self, sport: Sport) {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let mut newer = self.latest.subscribe();
        self.latest.send_if_modified(|current| {
            if seq > *current {
                *current = seq;
                true
            } else {
                false
            }
        });

        {
            let mut state = self.state.write().await;
            state.loading = true;
        }

        let result = tokio::select! {
            result = self.client.fetch_odds(sport) => result,
            _ = superseded(&mut newer, seq) => {
                debug!(%sport, seq, "refresh superseded in flight, dropping request");
                return;
            }
        };

        let mut state = self.state.write().await;
        if self.issued.load(Ordering::SeqCst) != seq {
            debug!(%sport, seq, "stale refresh response discarded");
            return;
        }

        state.loading = false;
        state.sport = sport;
        match result {
            Ok(games) => {
                debug!(%sport, count = games.len(), "odds board replaced");
                state.games = games;
                state.error = None;
            }
            Err(err) => {
                warn!(%sport, error = %err, "odds refresh failed");
                state.error = Some(format!("Failed to load {} odds: {}", sport.alias(), err));
            }
        }
    }
}

/// Resolves once a refresh newer than `seq` has been issued
async fn superseded(newer: &mut watch::Receiver<u64>, seq: u64) {
    loop {
        if *newer.borrow_and_update() > seq {
            return;
        }
        if newer.changed().await.is_err() {
            // Feed dropped; nothing can supersede us anymore
            std::future::pending::<()>().await;
        }
    }
}
