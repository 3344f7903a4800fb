pub mod analysis;
pub mod api;
pub mod config;
pub mod feed;
pub mod models;
pub mod utils;

pub use analysis::PickCoordinator;
pub use api::{ApiError, Health, PicksApiClient};
pub use config::Config;
pub use feed::{FeedState, OddsFeed, SharedFeedState};
pub use models::*;
