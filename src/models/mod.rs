//! Data models for the forecast service
//!
//! This module contains the domain models organized by concern:
//! - Weather: raw provider observations
//! - Forecast: per-day summaries and the structured model output

pub mod forecast;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{DailySummary, ForecastResult};
pub use weather::WeatherEntry;
