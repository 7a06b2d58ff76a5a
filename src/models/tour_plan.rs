use serde::{Deserialize, Serialize};

use crate::models::geo::Coordinates;
use crate::models::itinerary::ItineraryEntry;
use crate::models::trip_request::TripSpec;
use crate::models::weather::Forecast;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub transport_cost: f64,
    pub accommodation_cost: f64,
    pub food_cost: f64,
    pub other_cost: f64,
    /// Always the sum of the four buckets above.
    pub total_cost: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Tip {
    pub title: String,
    pub description: String,
}

impl Tip {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DestinationMeta {
    pub name: String,
    pub coordinates: Coordinates,
    pub map_url: String,
    pub distance_from_origin_km: f64,
    pub hotel_options: usize,
    pub restaurant_options: usize,
    pub attraction_options: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TourPlan {
    pub trip_request: TripSpec,
    pub itinerary: Vec<ItineraryEntry>,
    pub cost_summary: CostSummary,
    pub tips: Vec<Tip>,
    pub weather: Forecast,
    pub destination_meta: DestinationMeta,
}
