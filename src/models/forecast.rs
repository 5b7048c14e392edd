//! Forecast summary and structured result models

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reduced statistics for one calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Mean temperature in Celsius, rounded to one decimal
    pub average_temperature: f64,
    /// Most frequent condition description of the day
    pub description: String,
}

impl DailySummary {
    /// Format temperature with one decimal and unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.average_temperature)
    }

    /// Render the summary as one line of aggregated forecast text
    #[must_use]
    pub fn to_line(&self) -> String {
        format!(
            "{}: Avg Temp: {}, Condition: {}",
            self.date,
            self.format_temperature(),
            self.description
        )
    }
}

/// Structured forecast produced by the text-generation backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastResult {
    /// The location the forecast was requested for
    pub location: String,
    /// The weather forecast, written in character
    pub forecast: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let summary = DailySummary {
            date: "2024-05-01".to_string(),
            average_temperature: 21.0,
            description: "cloudy".to_string(),
        };
        assert_eq!(
            summary.to_line(),
            "2024-05-01: Avg Temp: 21.0°C, Condition: cloudy"
        );
    }

    #[test]
    fn test_summary_negative_temperature() {
        let summary = DailySummary {
            date: "2024-01-15".to_string(),
            average_temperature: -3.5,
            description: "snow".to_string(),
        };
        assert_eq!(summary.format_temperature(), "-3.5°C");
    }
}
