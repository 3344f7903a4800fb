use anyhow::{Context, Result};

/// Backend settings, read from the environment (a `.env` file is honored
/// when present). The base URL has no default on purpose.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("PICKS_API_URL")
            .context("PICKS_API_URL not set; point it at your picks backend")?;
        let api_token = std::env::var("PICKS_API_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        Ok(Self { api_url, api_token })
    }
}
