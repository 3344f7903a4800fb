//! Wire-level tests for the backend client against a mock server.

use pickboard::api::{ApiError, PicksApiClient};
use pickboard::models::{AnalysisRequest, Market, Sport};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn nfl_board() -> serde_json::Value {
    json!({
        "sport": "americanfootball_nfl",
        "games": [{
            "game": "A @ B",
            "home_team": "B",
            "away_team": "A",
            "home_odds": -150,
            "away_odds": 130,
            "home_spread": -3.5,
            "away_spread": 3.5,
            "commence": "2024-01-01T18:00:00Z"
        }]
    })
}

fn moneyline_request() -> AnalysisRequest {
    AnalysisRequest {
        sport: Sport::Nfl,
        home_team: "B".to_string(),
        away_team: "A".to_string(),
        market: Market::Moneyline,
    }
}

#[tokio::test]
async fn fetch_odds_hits_the_sport_path_and_maps_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/odds/americanfootball_nfl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nfl_board()))
        .expect(1)
        .mount(&server)
        .await;

    let client = PicksApiClient::new(server.uri());
    let games = client.fetch_odds(Sport::Nfl).await.unwrap();

    assert_eq!(games.len(), 1);
    let game = &games[0];
    assert_eq!(game.matchup, "A @ B");
    assert_eq!(game.home_team, "B");
    assert_eq!(game.away_team, "A");
    assert_eq!(game.home_odds, -150);
    assert_eq!(game.away_odds, 130);
    assert_eq!(game.home_spread, Some(-3.5));
    assert_eq!(game.away_spread, Some(3.5));
}

#[tokio::test]
async fn fetch_odds_treats_missing_games_key_as_empty_board() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/odds/baseball_mlb"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"sport": "baseball_mlb"})),
        )
        .mount(&server)
        .await;

    let client = PicksApiClient::new(server.uri());
    let games = client.fetch_odds(Sport::Mlb).await.unwrap();
    assert!(games.is_empty());
}

#[tokio::test]
async fn fetch_odds_surfaces_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/odds/basketball_nba"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = PicksApiClient::new(server.uri());
    let err = client.fetch_odds(Sport::Nba).await.unwrap_err();
    assert!(matches!(err, ApiError::Http(status) if status.as_u16() == 503));
}

#[tokio::test]
async fn fetch_odds_surfaces_malformed_bodies_as_parse_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/odds/icehockey_nhl"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = PicksApiClient::new(server.uri());
    let err = client.fetch_odds(Sport::Nhl).await.unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn analyze_posts_the_request_body_and_returns_the_pick() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_partial_json(json!({
            "sport": "americanfootball_nfl",
            "home_team": "B",
            "away_team": "A",
            "market": "moneyline"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pick": "B",
            "confidence": 0.62,
            "expected_value": 0.04
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = PicksApiClient::new(server.uri());
    let pick = client.analyze(&moneyline_request()).await.unwrap();
    assert_eq!(pick.pick, "B");
    assert_eq!(pick.confidence, 0.62);
    assert_eq!(pick.expected_value, 0.04);
    assert_eq!(pick.spread_value, None);
}

#[tokio::test]
async fn analyze_error_body_is_market_unavailable_not_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "No spread market"})),
        )
        .mount(&server)
        .await;

    let client = PicksApiClient::new(server.uri());
    let err = client.analyze(&moneyline_request()).await.unwrap_err();
    assert!(matches!(err, ApiError::MarketUnavailable(reason) if reason == "No spread market"));
}

#[tokio::test]
async fn configured_token_is_sent_as_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header("authorization", "Bearer seekrit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = PicksApiClient::new(server.uri()).with_token(Some("seekrit".to_string()));
    assert!(client.is_authenticated());
    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn client_without_token_is_unauthenticated() {
    let client = PicksApiClient::new("http://localhost:9");
    assert!(!client.is_authenticated());
}
