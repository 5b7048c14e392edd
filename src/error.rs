//! Error types and handling for the forecast service

use axum::http::StatusCode;
use thiserror::Error;

/// Message returned to callers that did not supply a usable location.
pub const MISSING_LOCATION_MESSAGE: &str = "Please provide a location in the request body.";

/// Message returned for every failure inside the forecast pipeline.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Main error type for the forecast service
#[derive(Error, Debug)]
pub enum SidekickError {
    /// Missing or invalid startup configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Weather provider could not deliver a usable forecast
    #[error("Weather fetch failed for '{location}': {message}")]
    WeatherFetch { location: String, message: String },

    /// Text-generation backend failure
    #[error("Completion failed: {message}")]
    Completion { message: String },

    /// Model output did not match the expected structure
    #[error("Schema validation failed: {message}")]
    SchemaValidation { message: String },

    /// Client supplied an unusable request
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl SidekickError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new weather fetch error for `location`
    pub fn weather_fetch<L: Into<String>, S: Into<String>>(location: L, message: S) -> Self {
        Self::WeatherFetch {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a new completion error
    pub fn completion<S: Into<String>>(message: S) -> Self {
        Self::Completion {
            message: message.into(),
        }
    }

    /// Create a new schema validation error
    pub fn schema_validation<S: Into<String>>(message: S) -> Self {
        Self::SchemaValidation {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// HTTP status this error maps to at the request boundary
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            SidekickError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message that may be shown to a caller.
    ///
    /// Internal detail never leaves the process; only validation failures
    /// carry a specific message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SidekickError::Validation { .. } => MISSING_LOCATION_MESSAGE.to_string(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}
