//! Contracts for the external collaborators the itinerary builder depends on.
//!
//! Every lookup is fallible. How a failure is handled (placeholder, default
//! tips, empty list, or aborting the build) is decided by the builder, not by
//! the implementations.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::ServiceError;
use crate::models::{
    geo::Coordinates,
    places::{Attraction, Hotel, Restaurant},
    tour_plan::Tip,
    trip_request::{BudgetTier, TravelerType},
    weather::Forecast,
};

#[async_trait]
pub trait PlaceSearchService: Send + Sync {
    /// Zero results is `Ok(vec![])`, never an error.
    async fn find_attractions(
        &self,
        coords: Coordinates,
        budget_tier: BudgetTier,
    ) -> Result<Vec<Attraction>, ServiceError>;

    async fn find_hotels(
        &self,
        coords: Coordinates,
        budget_tier: BudgetTier,
        traveler_type: TravelerType,
        party_size: u32,
    ) -> Result<Vec<Hotel>, ServiceError>;

    /// Results carry a meal tag assigned round-robin over result order.
    async fn find_restaurants(
        &self,
        coords: Coordinates,
        budget_tier: BudgetTier,
    ) -> Result<Vec<Restaurant>, ServiceError>;
}

#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn forecast(
        &self,
        coords: Coordinates,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Forecast, ServiceError>;
}

#[async_trait]
pub trait AdviceService: Send + Sync {
    async fn local_tips(
        &self,
        destination_name: &str,
        traveler_type: TravelerType,
        forecast: &Forecast,
    ) -> Result<Vec<Tip>, ServiceError>;
}

#[async_trait]
pub trait GeoDistanceService: Send + Sync {
    /// Road distance in kilometres.
    async fn distance_km(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<f64, ServiceError>;
}
