//! Google Places backed attraction, hotel and restaurant search.
//!
//! Google only reports a coarse `price_level`, so prices are estimated from
//! fixed base rates scaled by the requested budget tier.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::models::{
    geo::Coordinates,
    places::{Attraction, AttractionCategory, Hotel, MealType, Restaurant},
    trip_request::{BudgetTier, TravelerType},
};
use crate::services::interfaces::PlaceSearchService;

const NEARBY_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";
const MAX_RESULTS: usize = 10;
const BASE_HOTEL_NIGHT: f64 = 6000.0;
const BASE_MEAL_COST: f64 = 1000.0;
const LARGE_PARTY: u32 = 4;
const WELL_REVIEWED: u32 = 100;

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
struct PlaceResult {
    name: String,
    vicinity: Option<String>,
    geometry: PlaceGeometry,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
struct PlaceGeometry {
    location: PlaceLocation,
}

#[derive(Debug, Deserialize, Clone)]
struct PlaceLocation {
    lat: f64,
    lng: f64,
}

impl PlaceResult {
    fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.geometry.location.lat, self.geometry.location.lng)
    }

    fn address(&self) -> String {
        self.vicinity.clone().unwrap_or_else(|| self.name.clone())
    }

    fn readable_types(&self) -> Vec<String> {
        self.types
            .iter()
            .filter(|t| !matches!(t.as_str(), "point_of_interest" | "establishment"))
            .map(|t| t.replace('_', " "))
            .collect()
    }
}

/// Best rated first. Ties keep Google's order.
fn rank_by_rating(mut results: Vec<PlaceResult>) -> Vec<PlaceResult> {
    results.sort_by(|a, b| {
        b.rating
            .unwrap_or(0.0)
            .partial_cmp(&a.rating.unwrap_or(0.0))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(MAX_RESULTS);
    results
}

fn hotel_keyword(traveler_type: TravelerType) -> &'static str {
    match traveler_type {
        TravelerType::Solo => "hotel",
        TravelerType::Couple => "resort",
        TravelerType::Family => "family hotel",
        TravelerType::Friends => "guest house",
    }
}

fn to_attraction(place: &PlaceResult, tier: BudgetTier) -> Attraction {
    let category = AttractionCategory::from_place_types(&place.types);
    let kinds = place.readable_types();
    let description = if kinds.is_empty() {
        format!("Explore {}", place.name)
    } else {
        format!("Explore {} ({})", place.name, kinds.join(", "))
    };

    Attraction {
        name: place.name.clone(),
        address: place.address(),
        coordinates: place.coordinates(),
        description,
        category,
        entry_fee: category.base_entry_fee() * tier.price_factor(),
        rating: place.rating,
    }
}

fn to_hotel(place: &PlaceResult, tier: BudgetTier) -> Hotel {
    Hotel {
        name: place.name.clone(),
        address: place.address(),
        coordinates: place.coordinates(),
        price_per_night: BASE_HOTEL_NIGHT * tier.price_factor(),
        rating: place.rating,
        contact: None,
        amenities: place.readable_types(),
    }
}

fn to_restaurant(index: usize, place: &PlaceResult, tier: BudgetTier) -> Restaurant {
    Restaurant {
        name: place.name.clone(),
        address: place.address(),
        coordinates: place.coordinates(),
        avg_cost: BASE_MEAL_COST * tier.price_factor(),
        meal_type: MealType::for_index(index),
        cuisine: None,
        rating: place.rating,
    }
}

pub struct GooglePlacesService {
    http_client: reqwest::Client,
    api_key: String,
    radius_meters: u32,
}

impl GooglePlacesService {
    pub fn new(config: &AppConfig) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.lookup_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.google_maps_api_key.clone(),
            radius_meters: config.search_radius_meters,
        })
    }

    async fn nearby_search(
        &self,
        coords: Coordinates,
        place_type: &str,
        keyword: Option<&str>,
        price_levels: Option<(u8, u8)>,
    ) -> Result<Vec<PlaceResult>, ServiceError> {
        let mut params: Vec<(&str, String)> = vec![
            ("location", coords.as_query()),
            ("radius", self.radius_meters.to_string()),
            ("type", place_type.to_string()),
        ];
        if let Some(keyword) = keyword {
            params.push(("keyword", keyword.to_string()));
        }
        if let Some((min, max)) = price_levels {
            params.push(("minprice", min.to_string()));
            params.push(("maxprice", max.to_string()));
        }
        debug!("Places nearby search: type={} params={:?}", place_type, params);
        params.push(("key", self.api_key.clone()));

        let response = self
            .http_client
            .get(NEARBY_SEARCH_URL)
            .query(&params)
            .send()
            .await?;
        let response_text = response.text().await?;

        let parsed: NearbySearchResponse = serde_json::from_str(&response_text).map_err(|e| {
            ServiceError::Decode(format!(
                "Failed to parse Places response: {}. Response: {}",
                e, response_text
            ))
        })?;

        match parsed.status.as_str() {
            "OK" => Ok(parsed.results),
            "ZERO_RESULTS" => Ok(Vec::new()),
            status => Err(ServiceError::Api(format!(
                "Places API error: {}{}",
                status,
                parsed
                    .error_message
                    .map(|m| format!(" ({})", m))
                    .unwrap_or_default()
            ))),
        }
    }
}

#[async_trait]
impl PlaceSearchService for GooglePlacesService {
    async fn find_attractions(
        &self,
        coords: Coordinates,
        budget_tier: BudgetTier,
    ) -> Result<Vec<Attraction>, ServiceError> {
        let results = self
            .nearby_search(coords, "tourist_attraction", None, None)
            .await?;
        let attractions: Vec<Attraction> = rank_by_rating(results)
            .iter()
            .map(|place| to_attraction(place, budget_tier))
            .collect();
        info!("Places search returned {} attractions", attractions.len());
        Ok(attractions)
    }

    async fn find_hotels(
        &self,
        coords: Coordinates,
        budget_tier: BudgetTier,
        traveler_type: TravelerType,
        party_size: u32,
    ) -> Result<Vec<Hotel>, ServiceError> {
        let results = self
            .nearby_search(
                coords,
                "lodging",
                Some(hotel_keyword(traveler_type)),
                Some(budget_tier.price_levels()),
            )
            .await?;

        let mut ranked = rank_by_rating(results);
        if party_size > LARGE_PARTY {
            // Stable: keeps rating order inside each group.
            ranked.sort_by_key(|place| place.user_ratings_total.unwrap_or(0) <= WELL_REVIEWED);
        }

        Ok(ranked.iter().map(|place| to_hotel(place, budget_tier)).collect())
    }

    async fn find_restaurants(
        &self,
        coords: Coordinates,
        budget_tier: BudgetTier,
    ) -> Result<Vec<Restaurant>, ServiceError> {
        let results = self
            .nearby_search(coords, "restaurant", None, Some(budget_tier.price_levels()))
            .await?;
        Ok(rank_by_rating(results)
            .iter()
            .enumerate()
            .map(|(index, place)| to_restaurant(index, place, budget_tier))
            .collect())
    }
}
