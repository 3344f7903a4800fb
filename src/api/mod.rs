pub mod picks_api;

pub use picks_api::{ApiError, Health, PicksApiClient};
