//! Daily forecast aggregation
//!
//! Groups raw provider entries by calendar day and reduces each day to a
//! mean temperature and a modal condition description. Days keep the order
//! in which they first appear in the provider response.

use std::collections::HashMap;

use crate::models::{DailySummary, WeatherEntry};

#[derive(Default)]
struct DayAccumulator {
    temperatures: Vec<f64>,
    descriptions: Vec<String>,
}

/// Render the aggregated forecast text for `entries`, one line per day.
///
/// An empty slice yields an empty string.
#[must_use]
pub fn aggregate(entries: &[WeatherEntry]) -> String {
    summarize(entries)
        .iter()
        .map(DailySummary::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reduce `entries` to one [`DailySummary`] per distinct date, in first-seen order.
#[must_use]
pub fn summarize(entries: &[WeatherEntry]) -> Vec<DailySummary> {
    let mut order: Vec<String> = Vec::new();
    let mut days: HashMap<String, DayAccumulator> = HashMap::new();

    for entry in entries {
        let key = entry.date_key();
        let day = days.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            DayAccumulator::default()
        });
        day.temperatures.push(entry.temperature);
        day.descriptions.push(entry.description.clone());
    }

    order
        .into_iter()
        .filter_map(|date| {
            let day = days.remove(&date)?;
            Some(DailySummary {
                average_temperature: round_one_decimal(mean(&day.temperatures)),
                description: modal_description(&day.descriptions)?,
                date,
            })
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rounds half-way cases towards positive infinity.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Most frequent description.
///
/// Counts are kept in first-seen order, stably sorted ascending by count and
/// the last element wins. On a tie this picks the tied description that was
/// seen last for the first time.
fn modal_description(descriptions: &[String]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for description in descriptions {
        match counts
            .iter()
            .position(|(seen, _)| *seen == description.as_str())
        {
            Some(index) => counts[index].1 += 1,
            None => counts.push((description.as_str(), 1)),
        }
    }

    counts.sort_by_key(|(_, count)| *count);
    counts.last().map(|(description, _)| (*description).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use rstest::rstest;

    fn at(date: &str, hour: u32) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn entry(date: &str, hour: u32, temperature: f64, description: &str) -> WeatherEntry {
        WeatherEntry::new(at(date, hour), temperature, description)
    }

    #[test]
    fn test_mean_temperature_per_day() {
        let entries = vec![
            entry("2024-05-01", 9, 20.0, "cloudy"),
            entry("2024-05-01", 12, 22.0, "cloudy"),
            entry("2024-05-01", 15, 21.0, "sunny"),
        ];

        assert_eq!(
            aggregate(&entries),
            "2024-05-01: Avg Temp: 21.0°C, Condition: cloudy"
        );
    }

    #[test]
    fn test_one_line_per_day_in_first_seen_order() {
        let entries = vec![
            entry("2024-05-02", 0, 10.0, "rain"),
            entry("2024-05-01", 21, 12.0, "clear sky"),
            entry("2024-05-02", 3, 11.0, "rain"),
            entry("2024-05-03", 0, 14.0, "few clouds"),
        ];

        let text = aggregate(&entries);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("2024-05-02:"));
        assert!(lines[1].starts_with("2024-05-01:"));
        assert!(lines[2].starts_with("2024-05-03:"));
        assert_eq!(lines[0], "2024-05-02: Avg Temp: 10.5°C, Condition: rain");
    }

    #[test]
    fn test_single_entry_day_is_unchanged() {
        let entries = vec![entry("2024-05-01", 12, 17.3, "broken clouds")];
        assert_eq!(
            aggregate(&entries),
            "2024-05-01: Avg Temp: 17.3°C, Condition: broken clouds"
        );
    }

    #[test]
    fn test_empty_entries_yield_empty_text() {
        assert_eq!(aggregate(&[]), "");
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn test_mean_is_rounded_to_one_decimal() {
        let entries = vec![
            entry("2024-05-01", 0, 10.0, "clear sky"),
            entry("2024-05-01", 3, 10.0, "clear sky"),
            entry("2024-05-01", 6, 11.0, "clear sky"),
        ];
        let summaries = summarize(&entries);
        assert_eq!(summaries[0].average_temperature, 10.3);
        assert_eq!(summaries[0].format_temperature(), "10.3°C");
    }

    #[rstest]
    #[case(&["cloudy", "cloudy", "sunny"], "cloudy")]
    #[case(&["sunny", "rainy"], "rainy")]
    #[case(&["rainy", "sunny"], "sunny")]
    #[case(&["fog", "sunny", "fog", "sunny", "rain"], "sunny")]
    #[case(&["sunny", "rain", "rain", "sunny", "fog", "fog"], "fog")]
    #[case(&["mist"], "mist")]
    fn test_modal_description_tie_break(#[case] descriptions: &[&str], #[case] expected: &str) {
        let entries: Vec<WeatherEntry> = descriptions
            .iter()
            .enumerate()
            .map(|(i, d)| entry("2024-05-01", i as u32, 15.0, d))
            .collect();

        let summaries = summarize(&entries);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].description, expected);
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let entries = vec![
            entry("2024-05-01", 0, 9.25, "sunny"),
            entry("2024-05-01", 3, 8.0, "rainy"),
            entry("2024-05-02", 0, 12.0, "overcast clouds"),
            entry("2024-05-02", 3, 13.5, "light rain"),
        ];

        let first = aggregate(&entries);
        for _ in 0..10 {
            assert_eq!(aggregate(&entries), first);
        }
    }
}
