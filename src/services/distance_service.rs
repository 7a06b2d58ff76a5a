//! Road distance lookups against the Google Distance Matrix API.
//!
//! When a MongoDB client is supplied, successful lookups are cached in
//! `Itineraries.DistanceCache` so repeated origin/destination pairs do not
//! cost another API call. Cache failures are logged and never fail a lookup.
//!
//! ## Setup
//! 1. Enable the Distance Matrix API for your Google Cloud project
//! 2. Set `GOOGLE_MAPS_API_KEY`
//! 3. Optionally set `MONGODB_URI` to enable the cache

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use log::{debug, warn};
use mongodb::{bson::oid::ObjectId, Client, Collection};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::models::geo::Coordinates;
use crate::services::interfaces::GeoDistanceService;

const DISTANCE_MATRIX_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";
const CACHE_DURATION_SECS: i64 = 86400; // 24 hours
const COORD_TOLERANCE: f64 = 0.0001; // about 10 meters

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedDistance {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub distance_meters: u32,
    pub cached_at: mongodb::bson::DateTime,
    pub expires_at: mongodb::bson::DateTime,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<DistanceMatrixRow>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixRow {
    elements: Vec<DistanceMatrixElement>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixElement {
    status: String,
    distance: Option<DistanceValue>,
}

#[derive(Debug, Deserialize)]
struct DistanceValue {
    value: u32, // meters
}

fn meters_from_response(response: DistanceMatrixResponse) -> Result<u32, ServiceError> {
    if response.status != "OK" {
        return Err(ServiceError::Api(format!(
            "Distance Matrix error: {}{}",
            response.status,
            response
                .error_message
                .map(|m| format!(" ({})", m))
                .unwrap_or_default()
        )));
    }

    let element = response
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .ok_or_else(|| ServiceError::Api("No distance data returned".to_string()))?;

    if element.status != "OK" {
        return Err(ServiceError::Api(format!(
            "Distance Matrix element error: {}",
            element.status
        )));
    }

    element
        .distance
        .map(|d| d.value)
        .ok_or_else(|| ServiceError::Api("Distance not available".to_string()))
}

pub struct GoogleDistanceService {
    client: Option<Arc<Client>>,
    http_client: reqwest::Client,
    api_key: String,
}

impl GoogleDistanceService {
    pub fn new(config: &AppConfig, client: Option<Arc<Client>>) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.lookup_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            http_client,
            api_key: config.google_maps_api_key.clone(),
        })
    }

    fn cache_collection(&self) -> Option<Collection<CachedDistance>> {
        self.client
            .as_ref()
            .map(|client| client.database("Itineraries").collection("DistanceCache"))
    }

    async fn get_cached_distance(
        &self,
        collection: &Collection<CachedDistance>,
        origin: Coordinates,
        destination: Coordinates,
    ) -> mongodb::error::Result<Option<CachedDistance>> {
        let filter = mongodb::bson::doc! {
            "origin_lat": {
                "$gte": origin.lat - COORD_TOLERANCE,
                "$lte": origin.lat + COORD_TOLERANCE
            },
            "origin_lng": {
                "$gte": origin.lon - COORD_TOLERANCE,
                "$lte": origin.lon + COORD_TOLERANCE
            },
            "destination_lat": {
                "$gte": destination.lat - COORD_TOLERANCE,
                "$lte": destination.lat + COORD_TOLERANCE
            },
            "destination_lng": {
                "$gte": destination.lon - COORD_TOLERANCE,
                "$lte": destination.lon + COORD_TOLERANCE
            },
            "expires_at": { "$gt": mongodb::bson::DateTime::now() }
        };

        collection.find_one(filter).await
    }

    async fn cache_distance(
        &self,
        collection: &Collection<CachedDistance>,
        origin: Coordinates,
        destination: Coordinates,
        distance_meters: u32,
    ) -> mongodb::error::Result<()> {
        let now = mongodb::bson::DateTime::now();
        let expires_at =
            mongodb::bson::DateTime::from_millis(now.timestamp_millis() + CACHE_DURATION_SECS * 1000);

        let cached = CachedDistance {
            id: None,
            origin_lat: origin.lat,
            origin_lng: origin.lon,
            destination_lat: destination.lat,
            destination_lng: destination.lon,
            distance_meters,
            cached_at: now,
            expires_at,
        };

        collection.insert_one(cached).await?;
        Ok(())
    }

    async fn fetch_from_google_maps(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<u32, ServiceError> {
        let response = self
            .http_client
            .get(DISTANCE_MATRIX_URL)
            .query(&[
                ("origins", origin.as_query()),
                ("destinations", destination.as_query()),
                ("mode", "driving".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;
        let response_text = response.text().await?;

        let parsed: DistanceMatrixResponse = serde_json::from_str(&response_text).map_err(|e| {
            ServiceError::Decode(format!(
                "Failed to parse Google Maps response: {}. Response: {}",
                e, response_text
            ))
        })?;

        meters_from_response(parsed)
    }

    /// Remove expired cache entries. Returns how many were deleted.
    pub async fn cleanup_expired_cache(&self) -> mongodb::error::Result<u64> {
        let Some(collection) = self.cache_collection() else {
            return Ok(0);
        };

        let filter = mongodb::bson::doc! {
            "expires_at": { "$lt": mongodb::bson::DateTime::now() }
        };
        let result = collection.delete_many(filter).await?;
        debug!("Cleaned up {} expired distance cache entries", result.deleted_count);

        Ok(result.deleted_count)
    }
}

#[async_trait]
impl GeoDistanceService for GoogleDistanceService {
    async fn distance_km(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<f64, ServiceError> {
        let collection = self.cache_collection();

        if let Some(collection) = &collection {
            match self.get_cached_distance(collection, origin, destination).await {
                Ok(Some(cached)) => {
                    debug!(
                        "Using cached distance for ({:.4}, {:.4}) to ({:.4}, {:.4})",
                        origin.lat, origin.lon, destination.lat, destination.lon
                    );
                    return Ok(f64::from(cached.distance_meters) / 1000.0);
                }
                Ok(None) => {}
                Err(e) => warn!("Distance cache lookup failed: {}", e),
            }
        }

        debug!(
            "Fetching distance from Google Maps for ({:.4}, {:.4}) to ({:.4}, {:.4})",
            origin.lat, origin.lon, destination.lat, destination.lon
        );
        let meters = self.fetch_from_google_maps(origin, destination).await?;

        if let Some(collection) = &collection {
            if let Err(e) = self.cache_distance(collection, origin, destination, meters).await {
                warn!("Failed to cache distance result: {}", e);
            }
        }

        Ok(f64::from(meters) / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: serde_json::Value) -> DistanceMatrixResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_meters_from_ok_response() {
        let parsed = response(serde_json::json!({
            "status": "OK",
            "rows": [{ "elements": [{ "status": "OK", "distance": { "value": 300000 } }] }]
        }));
        assert_eq!(meters_from_response(parsed).unwrap(), 300000);
    }

    #[test]
    fn test_element_failure_is_an_error() {
        let parsed = response(serde_json::json!({
            "status": "OK",
            "rows": [{ "elements": [{ "status": "ZERO_RESULTS" }] }]
        }));
        let err = meters_from_response(parsed).unwrap_err();
        assert!(err.to_string().contains("ZERO_RESULTS"));
    }

    #[test]
    fn test_request_denied_carries_message() {
        let parsed = response(serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }));
        let err = meters_from_response(parsed).unwrap_err();
        assert!(err.to_string().contains("REQUEST_DENIED"));
        assert!(err.to_string().contains("API key is invalid"));
    }

    #[test]
    fn test_empty_rows_is_an_error() {
        let parsed = response(serde_json::json!({ "status": "OK", "rows": [] }));
        assert!(matches!(meters_from_response(parsed), Err(ServiceError::Api(_))));
    }
}
