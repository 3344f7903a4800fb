use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sports the picks backend publishes odds for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    #[serde(rename = "americanfootball_nfl")]
    Nfl,
    #[serde(rename = "americanfootball_ncaaf")]
    Ncaaf,
    #[serde(rename = "basketball_nba")]
    Nba,
    #[serde(rename = "baseball_mlb")]
    Mlb,
    #[serde(rename = "icehockey_nhl")]
    Nhl,
}

impl Sport {
    pub const ALL: [Sport; 5] = [Sport::Nfl, Sport::Ncaaf, Sport::Nba, Sport::Mlb, Sport::Nhl];

    /// Code used in backend URLs and request bodies
    pub fn code(&self) -> &'static str {
        match self {
            Sport::Nfl => "americanfootball_nfl",
            Sport::Ncaaf => "americanfootball_ncaaf",
            Sport::Nba => "basketball_nba",
            Sport::Mlb => "baseball_mlb",
            Sport::Nhl => "icehockey_nhl",
        }
    }

    /// Short name accepted on the command line
    pub fn alias(&self) -> &'static str {
        match self {
            Sport::Nfl => "nfl",
            Sport::Ncaaf => "ncaaf",
            Sport::Nba => "nba",
            Sport::Mlb => "mlb",
            Sport::Nhl => "nhl",
        }
    }
}

impl FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Sport::ALL
            .iter()
            .copied()
            .find(|sport| lower == sport.code() || lower == sport.alias())
            .ok_or_else(|| format!("unrecognized sport code: {}", s))
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Betting market a pick can be requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Moneyline,
    Spread,
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Market::Moneyline => f.write_str("moneyline"),
            Market::Spread => f.write_str("spread"),
        }
    }
}

/// One game row from the odds board
///
/// Odds are American format (negative = favorite). Spread lines are absent
/// when no bookmaker offers that market for the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    #[serde(rename = "game")]
    pub matchup: String,
    pub home_team: String,
    pub away_team: String,
    pub home_odds: i32,
    pub away_odds: i32,
    #[serde(default)]
    pub home_spread: Option<f64>,
    #[serde(default)]
    pub away_spread: Option<f64>,
    pub commence: DateTime<Utc>,
}

impl Game {
    /// Identity the pick record is keyed by
    pub fn key(&self) -> &str {
        &self.matchup
    }

    pub fn has_spread(&self) -> bool {
        self.home_spread.is_some() || self.away_spread.is_some()
    }
}

/// Body of a POST /analyze request
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    pub sport: Sport,
    pub home_team: String,
    pub away_team: String,
    pub market: Market,
}

impl AnalysisRequest {
    pub fn for_game(sport: Sport, game: &Game, market: Market) -> Self {
        Self {
            sport,
            home_team: game.home_team.clone(),
            away_team: game.away_team.clone(),
            market,
        }
    }
}

/// Recommendation returned by the backend model for one market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickResult {
    pub pick: String,
    pub confidence: f64,
    pub expected_value: f64,
    #[serde(default)]
    pub edge: Option<f64>,
    #[serde(default)]
    pub spread_value: Option<f64>,
    #[serde(default)]
    pub analysis_summary: Option<String>,
}

/// Overall state of a game's pick record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickStatus {
    Pending,
    Ready,
    Failed,
}

/// What happened to a single market's request
#[derive(Debug, Clone, PartialEq)]
pub enum MarketOutcome {
    Pending,
    Pick(PickResult),
    /// Market not offered for this game; rendered as "N/A", never an error
    Unavailable,
    Failed(String),
}

impl MarketOutcome {
    pub fn is_pick(&self) -> bool {
        matches!(self, MarketOutcome::Pick(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, MarketOutcome::Failed(_))
    }
}

/// Pick record for one game, keyed by game identity in the coordinator
#[derive(Debug, Clone, PartialEq)]
pub struct GamePick {
    pub status: PickStatus,
    pub moneyline: MarketOutcome,
    pub spread: MarketOutcome,
}

impl GamePick {
    /// Record inserted at dispatch time, before any response arrives
    pub fn pending(spread_requested: bool) -> Self {
        Self {
            status: PickStatus::Pending,
            moneyline: MarketOutcome::Pending,
            spread: if spread_requested {
                MarketOutcome::Pending
            } else {
                MarketOutcome::Unavailable
            },
        }
    }

    /// Failed only when nothing is displayable; partial success is Ready
    pub fn resolve_status(&mut self) {
        let any_pick = self.moneyline.is_pick() || self.spread.is_pick();
        let any_failed = self.moneyline.is_failed() || self.spread.is_failed();
        self.status = if !any_pick && any_failed {
            PickStatus::Failed
        } else {
            PickStatus::Ready
        };
    }
}
