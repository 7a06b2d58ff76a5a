use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const PLACEHOLDER_SUMMARY: &str = "Weather information is currently unavailable";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub condition: String,
    pub humidity: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub available: bool,
    pub summary: String,
    #[serde(default)]
    pub days: Vec<DailyForecast>,
}

impl Forecast {
    /// Stand-in used whenever the weather lookup fails.
    pub fn placeholder() -> Self {
        Self {
            available: false,
            summary: PLACEHOLDER_SUMMARY.to_string(),
            days: Vec::new(),
        }
    }

    pub fn from_days(days: Vec<DailyForecast>) -> Self {
        if days.is_empty() {
            return Self {
                available: true,
                summary: "No forecast is published yet for the selected dates".to_string(),
                days,
            };
        }

        let min = days.iter().map(|d| d.min_temp_c).fold(f64::INFINITY, f64::min);
        let max = days
            .iter()
            .map(|d| d.max_temp_c)
            .fold(f64::NEG_INFINITY, f64::max);
        let summary = format!(
            "{} with temperatures between {:.0}°C and {:.0}°C",
            days[0].condition, min, max
        );

        Self {
            available: true,
            summary,
            days,
        }
    }
}
