use std::time::Duration;

use thiserror::Error;

/// A required or malformed trip request field. Raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("distance lookup failed: {0}")]
    DistanceLookup(String),
    #[error("distance lookup returned a non-positive distance ({0} km)")]
    InvalidDistance(f64),
    #[error("distance lookup timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("transport cost unavailable: {0}")]
    Transport(#[from] TransportError),
    #[error("No {0} found")]
    NoResults(&'static str),
    #[error("itinerary assembly failed: {0}")]
    Assembly(String),
}

/// The only error surface of `ItineraryBuilder::build`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("invalid trip request: {0}")]
    Validation(#[from] ValidationError),
    #[error("tour plan generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl PlanError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, PlanError::Validation(_))
    }
}

/// Failure of an external collaborator (places, weather, advice, distance).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("service not configured: {0}")]
    NotConfigured(&'static str),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Request URLs carry API keys in their query strings, so they never make it
/// into an error message.
impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Http(err.without_url())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no JSON object found in text")]
    NoJson,
    #[error("malformed plan JSON: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },
}
