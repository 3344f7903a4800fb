use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use pickboard::analysis::PickCoordinator;
use pickboard::api::PicksApiClient;
use pickboard::config::Config;
use pickboard::feed::OddsFeed;
use pickboard::models::{Game, GamePick, MarketOutcome, PickStatus, Sport};
use pickboard::utils::odds::{
    american_odds_to_probability, format_odds, format_percent, format_spread,
};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pickboard", about = "Betting odds board with model-generated picks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List recognized sport codes
    Sports,
    /// Fetch and display the odds board for a sport
    Odds {
        #[arg(value_parser = parse_sport)]
        sport: Sport,
    },
    /// Request model picks for games on the board
    Analyze {
        #[arg(value_parser = parse_sport)]
        sport: Sport,
        /// Only analyze games whose matchup contains this text
        #[arg(long)]
        game: Option<String>,
    },
    /// Check that the picks backend is reachable
    Health,
}

fn parse_sport(s: &str) -> Result<Sport, String> {
    Sport::from_str(s)
}

/// Build the backend client once and share it between components
fn backend_client() -> Result<Arc<PicksApiClient>> {
    let config = Config::from_env()?;
    Ok(Arc::new(
        PicksApiClient::new(config.api_url).with_token(config.api_token),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Sports => {
            println!("Recognized sports:\n");
            for sport in Sport::ALL {
                println!("  {:<8} {}", sport.alias(), sport.code());
            }
        }

        Command::Health => {
            let client = backend_client()?;
            let health = client.health().await?;
            println!("Backend status: {}", health.status);
            if client.is_authenticated() {
                println!("Session token: configured");
            }
        }

        Command::Odds { sport } => {
            let client = backend_client()?;
            let feed = OddsFeed::new(client);
            feed.refresh(sport).await;

            let board = feed.snapshot().await;
            if let Some(error) = board.error {
                bail!(error);
            }
            if board.games.is_empty() {
                println!("No upcoming {} games on the board.", sport.alias());
                return Ok(());
            }

            println!("{} board ({} games)\n", sport.alias().to_uppercase(), board.games.len());
            for game in &board.games {
                print_card(game);
                println!();
            }
        }

        Command::Analyze { sport, game } => {
            let client = backend_client()?;
            let feed = OddsFeed::new(client.clone());
            feed.refresh(sport).await;

            let board = feed.snapshot().await;
            if let Some(error) = board.error {
                bail!(error);
            }

            let filter = game.map(|g| g.to_lowercase());
            let selected: Vec<Game> = board
                .games
                .iter()
                .filter(|g| match &filter {
                    Some(text) => g.matchup.to_lowercase().contains(text),
                    None => true,
                })
                .cloned()
                .collect();
            if selected.is_empty() {
                bail!("no games on the {} board match", sport.alias());
            }

            println!("Requesting picks for {} game(s)...\n", selected.len());
            let coordinator = PickCoordinator::new(client, feed.shared_state());
            let mut handles = Vec::new();
            for game in &selected {
                let coordinator = coordinator.clone();
                let game = game.clone();
                handles.push(tokio::spawn(async move {
                    coordinator.analyze(sport, &game).await;
                }));
            }
            for handle in handles {
                handle.await?;
            }

            for game in &selected {
                print_card(game);
                match coordinator.pick_for(game.key()).await {
                    Some(record) => print_pick(&record),
                    None => println!("  pick       game left the board before results arrived"),
                }
                println!();
            }
        }
    }

    Ok(())
}

fn print_card(game: &Game) {
    println!(
        "{}  ({})",
        game.matchup,
        game.commence.format("%Y-%m-%d %H:%M UTC")
    );
    println!(
        "  moneyline  {} {} ({})   {} {} ({})",
        game.away_team,
        format_odds(game.away_odds),
        format_percent(american_odds_to_probability(game.away_odds)),
        game.home_team,
        format_odds(game.home_odds),
        format_percent(american_odds_to_probability(game.home_odds)),
    );
    if game.has_spread() {
        println!(
            "  spread     {} {}   {} {}",
            game.away_team,
            spread_or_na(game.away_spread),
            game.home_team,
            spread_or_na(game.home_spread),
        );
    } else {
        println!("  spread     no line");
    }
}

fn spread_or_na(value: Option<f64>) -> String {
    value.map(format_spread).unwrap_or_else(|| "N/A".to_string())
}

fn print_pick(record: &GamePick) {
    if record.status == PickStatus::Failed {
        println!("  pick       analysis failed");
    }
    println!("  moneyline pick  {}", describe(&record.moneyline));
    println!("  spread pick     {}", describe(&record.spread));
}

fn describe(outcome: &MarketOutcome) -> String {
    match outcome {
        MarketOutcome::Pending => "pending".to_string(),
        MarketOutcome::Unavailable => "N/A".to_string(),
        MarketOutcome::Failed(message) => format!("failed ({})", message),
        MarketOutcome::Pick(pick) => {
            let mut line = format!(
                "{}  confidence {}  EV {:+.2}",
                pick.pick,
                format_percent(pick.confidence),
                pick.expected_value
            );
            if let Some(spread) = pick.spread_value {
                line.push_str(&format!("  line {}", format_spread(spread)));
            }
            if let Some(edge) = pick.edge {
                line.push_str(&format!("  edge {}", format_percent(edge)));
            }
            if let Some(summary) = &pick.analysis_summary {
                line.push_str(&format!("\n             {}", summary));
            }
            line
        }
    }
}
