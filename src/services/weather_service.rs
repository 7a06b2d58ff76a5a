use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::models::{
    geo::Coordinates,
    weather::{DailyForecast, Forecast},
};
use crate::services::interfaces::WeatherService;

const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastSlot>,
}

#[derive(Debug, Deserialize)]
struct ForecastSlot {
    dt_txt: String,
    main: SlotMain,
    #[serde(default)]
    weather: Vec<SlotCondition>,
}

#[derive(Debug, Deserialize)]
struct SlotMain {
    temp_min: f64,
    temp_max: f64,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SlotCondition {
    main: String,
}

/// Collapse 3-hourly slots into one entry per day inside `[start, end]`.
/// The condition reported most often that day wins; ties go to the earliest.
fn daily_from_slots(slots: &[ForecastSlot], start: NaiveDate, end: NaiveDate) -> Vec<DailyForecast> {
    struct Accumulator {
        min: f64,
        max: f64,
        humidity_sum: f64,
        humidity_count: u32,
        conditions: Vec<(String, u32)>,
    }

    let mut by_day: BTreeMap<NaiveDate, Accumulator> = BTreeMap::new();

    for slot in slots {
        let date = match NaiveDateTime::parse_from_str(&slot.dt_txt, "%Y-%m-%d %H:%M:%S") {
            Ok(ts) => ts.date(),
            Err(_) => continue,
        };
        if date < start || date > end {
            continue;
        }

        let acc = by_day.entry(date).or_insert(Accumulator {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            humidity_sum: 0.0,
            humidity_count: 0,
            conditions: Vec::new(),
        });
        acc.min = acc.min.min(slot.main.temp_min);
        acc.max = acc.max.max(slot.main.temp_max);
        if let Some(h) = slot.main.humidity {
            acc.humidity_sum += h;
            acc.humidity_count += 1;
        }
        if let Some(condition) = slot.weather.first() {
            match acc.conditions.iter_mut().find(|(c, _)| *c == condition.main) {
                Some((_, count)) => *count += 1,
                None => acc.conditions.push((condition.main.clone(), 1)),
            }
        }
    }

    by_day
        .into_iter()
        .map(|(date, acc)| {
            let mut condition = String::from("Unknown");
            let mut best = 0;
            for (name, count) in &acc.conditions {
                if *count > best {
                    best = *count;
                    condition = name.clone();
                }
            }
            DailyForecast {
                date,
                min_temp_c: acc.min,
                max_temp_c: acc.max,
                condition,
                humidity: (acc.humidity_count > 0)
                    .then(|| acc.humidity_sum / f64::from(acc.humidity_count)),
            }
        })
        .collect()
}

pub struct OpenWeatherService {
    http_client: reqwest::Client,
    api_key: Option<String>,
}

impl OpenWeatherService {
    pub fn new(config: &AppConfig) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.lookup_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.openweather_api_key.clone(),
        })
    }
}

#[async_trait]
impl WeatherService for OpenWeatherService {
    async fn forecast(
        &self,
        coords: Coordinates,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Forecast, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::NotConfigured("OPENWEATHER_API_KEY"))?;

        debug!(
            "Fetching forecast for ({:.4}, {:.4}) {} to {}",
            coords.lat, coords.lon, start_date, end_date
        );

        let response = self
            .http_client
            .get(FORECAST_URL)
            .query(&[
                ("lat", coords.lat.to_string()),
                ("lon", coords.lon.to_string()),
                ("units", "metric".to_string()),
                ("appid", api_key.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Api(format!("forecast request failed ({}): {}", status, body)));
        }

        let parsed: ForecastResponse = serde_json::from_str(&body)
            .map_err(|e| ServiceError::Decode(format!("{}. Response: {}", e, body)))?;

        Ok(Forecast::from_days(daily_from_slots(
            &parsed.list,
            start_date,
            end_date,
        )))
    }
}
