//! Weather observation model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One raw observation from the weather provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherEntry {
    /// Provider-local timestamp for this observation
    pub timestamp: NaiveDateTime,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Human-readable description of weather conditions
    pub description: String,
}

impl WeatherEntry {
    #[must_use]
    pub fn new(timestamp: NaiveDateTime, temperature: f64, description: impl Into<String>) -> Self {
        Self {
            timestamp,
            temperature,
            description: description.into(),
        }
    }

    /// Calendar date used as the grouping key, formatted `YYYY-MM-DD`
    #[must_use]
    pub fn date_key(&self) -> String {
        self.timestamp.date().format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_date_key() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap();
        let entry = WeatherEntry::new(timestamp, 4.5, "light rain");
        assert_eq!(entry.date_key(), "2024-03-09");
    }
}
