//! Sidekick Forecast - persona-styled weather forecasts over HTTP
//!
//! This library provides the forecast pipeline: fetching multi-day weather
//! data, reducing it to per-day summaries, prompting a text-generation
//! backend and strictly parsing its structured reply.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod service;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::SidekickConfig;
pub use error::SidekickError;
pub use llm::{CompletionProvider, OpenAiClient, PromptComposer, ResponseParser};
pub use models::{DailySummary, ForecastResult, WeatherEntry};
pub use service::{ForecastService, PipelineStage};
pub use weather::{OpenWeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SidekickError>;
