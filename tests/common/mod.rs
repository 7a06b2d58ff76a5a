#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App};
use async_trait::async_trait;
use chrono::NaiveDate;

use tourplan_api::{
    config::AppConfig,
    errors::ServiceError,
    models::{
        geo::Coordinates,
        places::{Attraction, AttractionCategory, Hotel, MealType, Restaurant},
        tour_plan::Tip,
        trip_request::{
            BudgetTier, CoordinatesInput, DateRangeInput, OriginInput, TransportMode, TravelerType,
            TripRequest,
        },
        weather::{DailyForecast, Forecast},
    },
    routes::{self, AppState},
    services::{
        interfaces::{AdviceService, GeoDistanceService, PlaceSearchService, WeatherService},
        itinerary_generation_service::{ItineraryBuilder, ItineraryGenerationConfig},
    },
};

pub const HUNZA: Coordinates = Coordinates {
    lat: 36.3167,
    lon: 74.65,
};
pub const ISLAMABAD: Coordinates = Coordinates {
    lat: 33.6844,
    lon: 73.0479,
};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn attraction(name: &str, category: AttractionCategory, entry_fee: f64) -> Attraction {
    Attraction {
        name: name.to_string(),
        address: format!("{}, Hunza", name),
        coordinates: Coordinates::new(36.32, 74.66),
        description: format!("Explore {}", name),
        category,
        entry_fee,
        rating: Some(4.5),
    }
}

pub fn hotel(name: &str, price_per_night: f64) -> Hotel {
    Hotel {
        name: name.to_string(),
        address: "Karimabad".to_string(),
        coordinates: Coordinates::new(36.325, 74.668),
        price_per_night,
        rating: Some(4.2),
        contact: Some("+92 5813 457000".to_string()),
        amenities: vec!["wifi".to_string()],
    }
}

pub fn restaurant(name: &str, meal_type: MealType, avg_cost: f64) -> Restaurant {
    Restaurant {
        name: name.to_string(),
        address: "Main bazaar, Karimabad".to_string(),
        coordinates: Coordinates::new(36.324, 74.667),
        avg_cost,
        meal_type,
        cuisine: None,
        rating: None,
    }
}

pub fn default_attractions() -> Vec<Attraction> {
    vec![
        attraction("Baltit Fort", AttractionCategory::Historical, 500.0),
        attraction("Attabad Lake", AttractionCategory::Hilly, 300.0),
        attraction("Eagle's Nest", AttractionCategory::Hilly, 300.0),
    ]
}

pub fn default_restaurants() -> Vec<Restaurant> {
    vec![
        restaurant("Cafe de Hunza", MealType::Breakfast, 1000.0),
        restaurant("Hunza Food Pavilion", MealType::Lunch, 1000.0),
        restaurant("Old Hunza Inn", MealType::Dinner, 1000.0),
    ]
}

/// A complete request from Islamabad to Hunza starting 2025-06-01.
pub fn trip_request(number_of_days: u32, party_size: u32, transport_mode: TransportMode) -> TripRequest {
    let start = date("2025-06-01");
    let end = start + chrono::Days::new(u64::from(number_of_days.saturating_sub(1)));
    TripRequest {
        destination_name: Some("Hunza".to_string()),
        destination_coordinates: Some(CoordinatesInput::from(HUNZA)),
        date_range: Some(DateRangeInput {
            start_date: Some(start),
            end_date: Some(end),
            number_of_days: Some(number_of_days),
        }),
        party_size: Some(party_size),
        traveler_type: Some(TravelerType::Family),
        transport_mode: Some(transport_mode),
        budget_tier: Some(BudgetTier::Moderate),
        origin: Some(OriginInput {
            city: Some("Islamabad".to_string()),
            coordinates: Some(CoordinatesInput::from(ISLAMABAD)),
        }),
    }
}

pub struct FakePlaces {
    pub attractions: Vec<Attraction>,
    pub hotels: Vec<Hotel>,
    pub restaurants: Vec<Restaurant>,
    pub fail_hotels: bool,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl Default for FakePlaces {
    fn default() -> Self {
        Self {
            attractions: default_attractions(),
            hotels: vec![hotel("Hunza Serena Inn", 5000.0)],
            restaurants: default_restaurants(),
            fail_hotels: false,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakePlaces {
    async fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl PlaceSearchService for FakePlaces {
    async fn find_attractions(
        &self,
        _coords: Coordinates,
        _budget_tier: BudgetTier,
    ) -> Result<Vec<Attraction>, ServiceError> {
        self.record().await;
        Ok(self.attractions.clone())
    }

    async fn find_hotels(
        &self,
        _coords: Coordinates,
        _budget_tier: BudgetTier,
        _traveler_type: TravelerType,
        _party_size: u32,
    ) -> Result<Vec<Hotel>, ServiceError> {
        self.record().await;
        if self.fail_hotels {
            return Err(ServiceError::Api("OVER_QUERY_LIMIT".to_string()));
        }
        Ok(self.hotels.clone())
    }

    async fn find_restaurants(
        &self,
        _coords: Coordinates,
        _budget_tier: BudgetTier,
    ) -> Result<Vec<Restaurant>, ServiceError> {
        self.record().await;
        Ok(self.restaurants.clone())
    }
}

#[derive(Default)]
pub struct FakeWeather {
    pub fail: bool,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl WeatherService for FakeWeather {
    async fn forecast(
        &self,
        _coords: Coordinates,
        start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> Result<Forecast, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(ServiceError::NotConfigured("OPENWEATHER_API_KEY"));
        }
        Ok(Forecast::from_days(vec![DailyForecast {
            date: start_date,
            min_temp_c: 11.0,
            max_temp_c: 23.0,
            condition: "Clear".to_string(),
            humidity: Some(40.0),
        }]))
    }
}

#[derive(Default)]
pub struct FakeAdvice {
    pub fail: bool,
    pub empty: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl AdviceService for FakeAdvice {
    async fn local_tips(
        &self,
        destination_name: &str,
        _traveler_type: TravelerType,
        _forecast: &Forecast,
    ) -> Result<Vec<Tip>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ServiceError::Api("quota exceeded".to_string()));
        }
        if self.empty {
            return Ok(Vec::new());
        }
        Ok(vec![Tip::new(
            "Try apricot cake",
            &format!("Every cafe in {} serves its own version.", destination_name),
        )])
    }
}

pub struct FakeDistance {
    pub km: Option<f64>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl FakeDistance {
    pub fn km(km: f64) -> Self {
        Self {
            km: Some(km),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            km: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl GeoDistanceService for FakeDistance {
    async fn distance_km(
        &self,
        _origin: Coordinates,
        _destination: Coordinates,
    ) -> Result<f64, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.km
            .ok_or_else(|| ServiceError::Api("Distance Matrix element error: ZERO_RESULTS".to_string()))
    }
}

/// Makes a real HTTP call that cannot connect, with an API key in the query
/// string the way the Google adapters send it.
pub struct UnreachableDistance {
    pub api_key: String,
}

#[async_trait]
impl GeoDistanceService for UnreachableDistance {
    async fn distance_km(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<f64, ServiceError> {
        let client = reqwest::Client::builder().no_proxy().build()?;
        client
            .get("http://127.0.0.1:1/maps/api/distancematrix/json")
            .query(&[
                ("origins", origin.as_query()),
                ("destinations", destination.as_query()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;
        Err(ServiceError::Api("unreachable endpoint answered".to_string()))
    }
}

/// Fakes wired into a builder, kept around so tests can inspect call counts.
pub struct Harness {
    pub places: Arc<FakePlaces>,
    pub weather: Arc<FakeWeather>,
    pub advice: Arc<FakeAdvice>,
    pub distance: Arc<FakeDistance>,
    /// Replaces `distance` in the builder when set.
    pub distance_override: Option<Arc<dyn GeoDistanceService>>,
    pub lookup_timeout: Duration,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            places: Arc::new(FakePlaces::default()),
            weather: Arc::new(FakeWeather::default()),
            advice: Arc::new(FakeAdvice::default()),
            distance: Arc::new(FakeDistance::km(300.0)),
            distance_override: None,
            lookup_timeout: Duration::from_secs(5),
        }
    }
}

impl Harness {
    pub fn builder(&self) -> ItineraryBuilder {
        let distance: Arc<dyn GeoDistanceService> = match &self.distance_override {
            Some(distance) => distance.clone(),
            None => self.distance.clone(),
        };
        ItineraryBuilder::with_config(
            self.places.clone(),
            self.weather.clone(),
            self.advice.clone(),
            distance,
            ItineraryGenerationConfig {
                lookup_timeout: self.lookup_timeout,
            },
        )
    }

    pub fn total_calls(&self) -> usize {
        self.places.calls.load(Ordering::SeqCst)
            + self.weather.calls.load(Ordering::SeqCst)
            + self.advice.calls.load(Ordering::SeqCst)
            + self.distance.calls.load(Ordering::SeqCst)
    }
}

pub fn test_config() -> AppConfig {
    AppConfig::from_vars(|key| match key {
        "GOOGLE_MAPS_API_KEY" => Some("test-maps-key".to_string()),
        _ => None,
    })
    .unwrap()
}

pub struct TestApp {
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub fn new(harness: &Harness) -> Self {
        let state = web::Data::new(AppState {
            builder: Arc::new(harness.builder()),
            mongo: None,
            config: test_config(),
        });
        Self { state }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .app_data(routes::tour_plan::json_config())
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api/tour-plans")
                    .route("", web::post().to(routes::tour_plan::create))
                    .route("/sample", web::get().to(routes::tour_plan::sample))
                    .route("/{id}", web::get().to(routes::tour_plan::get_by_id)),
            )
    }
}
