//! Weather provider seam
//!
//! The forecast pipeline only needs a list of raw observations for a place
//! name; [`WeatherProvider`] hides which service delivers them.

use async_trait::async_trait;

use crate::Result;
use crate::models::WeatherEntry;

pub mod open_weather;

pub use open_weather::OpenWeatherClient;

/// Source of multi-day, multi-entry weather observations
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch all forecast entries for `location` in provider order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SidekickError::WeatherFetch`] on network failure,
    /// non-success status, or an empty or malformed payload.
    async fn fetch(&self, location: &str) -> Result<Vec<WeatherEntry>>;
}
