use crate::models::{AnalysisRequest, Game, PickResult};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the picks backend, split by where the request died
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("backend returned {0}")]
    Http(StatusCode),
    #[error("malformed response: {0}")]
    Parse(String),
    /// The backend declined the market for this game ({"error": ...} body).
    /// Rendered as "N/A" downstream, never as an error banner.
    #[error("market unavailable: {0}")]
    MarketUnavailable(String),
}

/// Response from GET /odds/{sport}
///
/// The backend omits the games key when it has nothing to show; that is an
/// empty board, not an error.
#[derive(Debug, Deserialize)]
struct OddsResponse {
    #[serde(default)]
    games: Vec<Game>,
}

/// Response from POST /analyze: either a pick or an in-band rejection
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnalyzeResponse {
    Pick(PickResult),
    Rejected { error: String },
}

/// Response from GET /health
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
}

/// HTTP client for the picks backend
///
/// Constructed once at startup and shared; the base URL comes from
/// configuration and the optional bearer token is attached to every request.
pub struct PicksApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl PicksApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            token: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Whether a session token is configured for backend requests
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn prepare(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.timeout(REQUEST_TIMEOUT);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch the current odds board for a sport
    pub async fn fetch_odds(&self, sport: crate::models::Sport) -> Result<Vec<Game>, ApiError> {
        let url = format!("{}/odds/{}", self.base_url, sport.code());
        debug!(%sport, "fetching odds board");

        let response = self.prepare(self.client.get(&url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http(status));
        }

        let body = response.text().await?;
        let parsed: OddsResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(parsed.games)
    }

    /// Request a pick for one game and market
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<PickResult, ApiError> {
        let url = format!("{}/analyze", self.base_url);
        debug!(
            sport = %request.sport,
            market = %request.market,
            home = %request.home_team,
            away = %request.away_team,
            "requesting analysis"
        );

        let response = self
            .prepare(self.client.post(&url))
            .json(request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http(status));
        }

        let body = response.text().await?;
        let parsed: AnalyzeResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))?;
        match parsed {
            AnalyzeResponse::Pick(pick) => Ok(pick),
            AnalyzeResponse::Rejected { error } => Err(ApiError::MarketUnavailable(error)),
        }
    }

    /// Ping the backend health endpoint
    pub async fn health(&self) -> Result<Health, ApiError> {
        let url = format!("{}/health", self.base_url);

        let response = self.prepare(self.client.get(&url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http(status));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odds_response_without_games_key_is_empty() {
        let parsed: OddsResponse = serde_json::from_str(r#"{"sport": "baseball_mlb"}"#).unwrap();
        assert!(parsed.games.is_empty());
    }

    #[test]
    fn test_analyze_response_error_body() {
        let parsed: AnalyzeResponse =
            serde_json::from_str(r#"{"error": "No spread market"}"#).unwrap();
        assert!(matches!(parsed, AnalyzeResponse::Rejected { error } if error == "No spread market"));
    }

    #[test]
    fn test_analyze_response_pick_body() {
        let parsed: AnalyzeResponse = serde_json::from_str(
            r#"{"pick": "B", "confidence": 0.62, "expected_value": 0.04, "wager": 25.0}"#,
        )
        .unwrap();
        match parsed {
            AnalyzeResponse::Pick(pick) => {
                assert_eq!(pick.pick, "B");
                assert_eq!(pick.confidence, 0.62);
            }
            AnalyzeResponse::Rejected { .. } => panic!("expected a pick"),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = PicksApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url, "http://localhost:8000");
    }
}
