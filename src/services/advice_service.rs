use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::models::{tour_plan::Tip, trip_request::TravelerType, weather::Forecast};
use crate::services::interfaces::AdviceService;
use crate::services::plan_text_parser::extract_json_block;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MAX_TIPS: usize = 8;

/// The tips every plan falls back to when advice cannot be generated.
pub fn default_tips() -> Vec<Tip> {
    vec![
        Tip::new(
            "Carry identification",
            "Keep your CNIC or passport and a copy of your booking with you at all times.",
        ),
        Tip::new(
            "Check the weather",
            "Mountain weather changes quickly; look at the forecast each morning before heading out.",
        ),
        Tip::new(
            "Keep some cash",
            "Card machines and ATMs can be scarce outside city centres, so carry enough cash for meals and entry fees.",
        ),
        Tip::new(
            "Respect local customs",
            "Dress modestly and ask before photographing people, especially at religious sites.",
        ),
        Tip::new(
            "Stay hydrated and rested",
            "Drink bottled or boiled water and plan rest between long drives and hikes.",
        ),
    ]
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

fn build_prompt(destination_name: &str, traveler_type: TravelerType, forecast: &Forecast) -> String {
    format!(
        "You are a local travel guide. Give 5 practical tips for a {} visiting {}. \
         Expected weather: {}. Respond only with a JSON array of objects with \
         \"title\" and \"description\" string fields.",
        traveler_type.label(),
        destination_name,
        forecast.summary
    )
}

/// Pull the tip list out of model text. An empty list is an error so the
/// caller falls back to the defaults.
fn tips_from_text(text: &str) -> Result<Vec<Tip>, ServiceError> {
    let json = extract_json_block(text, '[', ']').map_err(|e| ServiceError::Decode(e.to_string()))?;
    let mut tips: Vec<Tip> =
        serde_json::from_str(&json).map_err(|e| ServiceError::Decode(e.to_string()))?;
    tips.retain(|tip| !tip.title.trim().is_empty() && !tip.description.trim().is_empty());
    tips.truncate(MAX_TIPS);

    if tips.is_empty() {
        return Err(ServiceError::Decode("model returned no tips".to_string()));
    }
    Ok(tips)
}

pub struct GeminiAdviceService {
    http_client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiAdviceService {
    pub fn new(config: &AppConfig) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.lookup_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
        })
    }
}

#[async_trait]
impl AdviceService for GeminiAdviceService {
    async fn local_tips(
        &self,
        destination_name: &str,
        traveler_type: TravelerType,
        forecast: &Forecast,
    ) -> Result<Vec<Tip>, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::NotConfigured("GEMINI_API_KEY"))?;

        let url = format!("{}/{}:generateContent", GEMINI_BASE_URL, self.model);
        debug!("Requesting local tips for {} from {}", destination_name, url);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(destination_name, traveler_type, forecast),
                }],
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Api(format!("advice request failed ({}): {}", status, body)));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ServiceError::Decode(format!("{}. Response: {}", e, body)))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .ok_or_else(|| ServiceError::Api("no candidates returned".to_string()))?;

        tips_from_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tips_are_complete() {
        let tips = default_tips();
        assert_eq!(tips.len(), 5);
        assert!(tips.iter().all(|t| !t.title.is_empty() && !t.description.is_empty()));
    }

    #[test]
    fn test_tips_from_model_text() {
        let text = "Here you go:\n```json\n[\n  {\"title\": \"Try chapshoro\", \"description\": \"A local meat pie.\"},\n  {\"title\": \"\", \"description\": \"dropped\"},\n]\n```";
        let tips = tips_from_text(text).unwrap();
        assert_eq!(tips, vec![Tip::new("Try chapshoro", "A local meat pie.")]);
    }

    #[test]
    fn test_empty_tip_list_is_an_error() {
        assert!(matches!(tips_from_text("[]"), Err(ServiceError::Decode(_))));
        assert!(matches!(tips_from_text("no json here"), Err(ServiceError::Decode(_))));
    }

    #[test]
    fn test_prompt_mentions_context() {
        let prompt = build_prompt("Naran", TravelerType::Family, &Forecast::placeholder());
        assert!(prompt.contains("Naran"));
        assert!(prompt.contains("family"));
        assert!(prompt.contains("JSON array"));
    }
}
