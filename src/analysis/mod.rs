//! Per-game pick requests and reconciliation.
//!
//! Pick records are keyed by game identity so analyses for different games
//! run independently; a settled result is attached only if the board still
//! lists the game it was requested for.

use crate::api::{ApiError, PicksApiClient};
use crate::feed::SharedFeedState;
use crate::models::{AnalysisRequest, Game, GamePick, Market, MarketOutcome, PickStatus, Sport};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Clone)]
pub struct PickCoordinator {
    client: Arc<PicksApiClient>,
    feed: SharedFeedState,
    picks: Arc<RwLock<HashMap<String, GamePick>>>,
}

impl PickCoordinator {
    pub fn new(client: Arc<PicksApiClient>, feed: SharedFeedState) -> Self {
        Self {
            client,
            feed,
            picks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Request picks for one game: moneyline always, spread only when the
    /// game carries a line. The two requests run in parallel and settle
    /// independently; one market failing does not block the other.
    ///
    /// A call for a game whose record is still pending is ignored, so a
    /// double trigger cannot interleave two result sets.
    pub async fn analyze(&self, sport: Sport, game: &Game) {
        let key = game.key().to_string();
        let want_spread = game.has_spread();

        {
            let mut picks = self.picks.write().await;
            if matches!(picks.get(&key), Some(record) if record.status == PickStatus::Pending) {
                debug!(game = %key, "analysis already pending, ignoring trigger");
                return;
            }
            picks.insert(key.clone(), GamePick::pending(want_spread));
        }

        let moneyline_request = AnalysisRequest::for_game(sport, game, Market::Moneyline);
        let (moneyline, spread) = if want_spread {
            let spread_request = AnalysisRequest::for_game(sport, game, Market::Spread);
            let (ml, sp) = tokio::join!(
                self.client.analyze(&moneyline_request),
                self.client.analyze(&spread_request)
            );
            (ml, Some(sp))
        } else {
            (self.client.analyze(&moneyline_request).await, None)
        };

        let still_listed = {
            let feed = self.feed.read().await;
            feed.sport == sport && feed.games.iter().any(|g| g.key() == key)
        };

        let mut picks = self.picks.write().await;
        if !still_listed {
            debug!(game = %key, "game left the board, discarding analysis result");
            picks.remove(&key);
            return;
        }

        let record = picks
            .entry(key)
            .or_insert_with(|| GamePick::pending(want_spread));
        record.moneyline = settle(moneyline);
        record.spread = match spread {
            Some(result) => settle(result),
            // No line on the board, so no request was made
            None => MarketOutcome::Unavailable,
        };
        record.resolve_status();
    }

    /// Current record for a game, if any
    pub async fn pick_for(&self, game_key: &str) -> Option<GamePick> {
        self.picks.read().await.get(game_key).cloned()
    }

    /// Owned copy of every pick record for rendering
    pub async fn snapshot(&self) -> HashMap<String, GamePick> {
        self.picks.read().await.clone()
    }
}

fn settle(result: Result<crate::models::PickResult, ApiError>) -> MarketOutcome {
    match result {
        Ok(pick) => MarketOutcome::Pick(pick),
        Err(ApiError::MarketUnavailable(reason)) => {
            debug!(%reason, "market not offered for this game");
            MarketOutcome::Unavailable
        }
        Err(err) => MarketOutcome::Failed(err.to_string()),
    }
}
