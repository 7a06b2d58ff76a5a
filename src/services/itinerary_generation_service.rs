use std::{future::Future, sync::Arc, time::Duration};

use chrono::NaiveDate;
use log::{info, warn};

use crate::errors::{GenerationError, PlanError, ServiceError, TransportError};
use crate::models::{
    geo::Coordinates,
    itinerary::{EntryDetails, EntryKind, ItineraryEntry},
    places::{Attraction, Hotel, MealType, Restaurant},
    tour_plan::{DestinationMeta, Tip, TourPlan},
    trip_request::{TripRequest, TripSpec},
    weather::Forecast,
};
use crate::services::advice_service::default_tips;
use crate::services::cost_aggregator::CostAggregator;
use crate::services::interfaces::{
    AdviceService, GeoDistanceService, PlaceSearchService, WeatherService,
};
use crate::services::transport_cost_service::{TransportCostEstimator, TransportEstimate};

const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

const OUTBOUND_TIME: &str = "08:00";
const CHECK_IN_TIME: &str = "14:00";
const BREAKFAST_TIME: &str = "08:00";
const LUNCH_TIME: &str = "13:00";
const DINNER_TIME: &str = "19:00";
const RETURN_TO_ROOM_TIME: &str = "22:00";
const DEPARTURE_TIME: &str = "16:00";
const ATTRACTION_SLOTS: [&str; 4] = ["10:00", "12:00", "15:00", "17:00"];

#[derive(Clone, Debug)]
pub struct ItineraryGenerationConfig {
    /// Upper bound on each external call; a timeout counts as that lookup failing.
    pub lookup_timeout: Duration,
}

impl Default for ItineraryGenerationConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
        }
    }
}

/// Anything that can be placed on the itinerary.
trait Stop {
    fn name(&self) -> &str;
    fn address(&self) -> &str;
    fn coordinates(&self) -> Coordinates;
}

macro_rules! impl_stop {
    ($($ty:ty),*) => {
        $(impl Stop for $ty {
            fn name(&self) -> &str { &self.name }
            fn address(&self) -> &str { &self.address }
            fn coordinates(&self) -> Coordinates { self.coordinates }
        })*
    };
}

impl_stop!(Attraction, Hotel, Restaurant);

struct Waypoint {
    name: String,
    address: String,
    coordinates: Coordinates,
}

impl_stop!(Waypoint);

fn entry(
    date: NaiveDate,
    time: &str,
    kind: EntryKind,
    stop: &dyn Stop,
    description: String,
    estimated_cost: f64,
) -> ItineraryEntry {
    ItineraryEntry {
        date,
        time: time.to_string(),
        kind,
        place_name: stop.name().to_string(),
        address: stop.address().to_string(),
        coordinates: stop.coordinates(),
        description,
        map_url: stop.coordinates().map_url(),
        estimated_cost,
        details: None,
    }
}

async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Timeout(limit)),
    }
}

/// The attractions scheduled on 1-based `day`. Consecutive slices of
/// `ceil(total / days)`; once the pool runs out each remaining day gets a
/// single attraction picked by wrapping the slice start around the pool.
fn attractions_for_day(attractions: &[Attraction], day: u32, days: u32) -> &[Attraction] {
    let total = attractions.len();
    if total == 0 {
        return &[];
    }

    let per_day = total.div_ceil(days.max(1) as usize).max(1);
    let start = (day.saturating_sub(1) as usize) * per_day;

    if start >= total {
        let wrapped = start % total;
        &attractions[wrapped..=wrapped]
    } else {
        &attractions[start..(start + per_day).min(total)]
    }
}

/// Per-meal rotation so consecutive days visit different places when
/// several restaurants carry the same tag.
fn restaurant_for_meal(restaurants: &[Restaurant], meal: MealType, day: u32) -> Option<&Restaurant> {
    let tagged: Vec<&Restaurant> = restaurants.iter().filter(|r| r.meal_type == meal).collect();
    if tagged.is_empty() {
        return None;
    }
    Some(tagged[(day.saturating_sub(1) as usize) % tagged.len()])
}

fn assemble_itinerary(
    trip: &TripSpec,
    transport: &TransportEstimate,
    hotel: &Hotel,
    restaurants: &[Restaurant],
    attractions: &[Attraction],
) -> Result<Vec<ItineraryEntry>, GenerationError> {
    let days = trip.date_range.number_of_days;
    let party = f64::from(trip.party_size);
    let date_of = |day: u32| {
        trip.date_range.date_of_day(day).ok_or_else(|| {
            GenerationError::Assembly(format!("trip day {} is outside the calendar", day))
        })
    };

    let destination = Waypoint {
        name: format!("{} to {}", trip.origin.city, trip.destination_name),
        address: trip.destination_name.clone(),
        coordinates: trip.destination_coordinates,
    };
    let home = Waypoint {
        name: format!("{} to {}", trip.destination_name, trip.origin.city),
        address: trip.origin.city.clone(),
        coordinates: trip.origin.coordinates,
    };

    let mut entries = Vec::new();
    let first_day = date_of(1)?;

    entries.push(entry(
        first_day,
        OUTBOUND_TIME,
        EntryKind::Transport,
        &destination,
        format!(
            "Travel by {} from {} to {} ({:.0} km)",
            transport.mode.as_str(),
            trip.origin.city,
            trip.destination_name,
            transport.distance_km
        ),
        transport.total_cost,
    ));

    let rooms = trip.rooms_needed();
    let nights = trip.nights();
    let mut check_in = entry(
        first_day,
        CHECK_IN_TIME,
        EntryKind::Hotel,
        hotel,
        format!(
            "Check in at {}: {} room(s) for {} night(s)",
            hotel.name, rooms, nights
        ),
        hotel.price_per_night * f64::from(rooms) * f64::from(nights),
    );
    check_in.details = Some(EntryDetails {
        rating: hotel.rating,
        contact: hotel.contact.clone(),
        amenities: hotel.amenities.clone(),
    });
    entries.push(check_in);

    for day in 1..=days {
        let date = date_of(day)?;

        if let Some(place) = restaurant_for_meal(restaurants, MealType::Breakfast, day) {
            entries.push(meal_entry(date, BREAKFAST_TIME, MealType::Breakfast, place, party));
        }

        for (slot, attraction) in attractions_for_day(attractions, day, days).iter().enumerate() {
            let mut visit = entry(
                date,
                ATTRACTION_SLOTS[slot % ATTRACTION_SLOTS.len()],
                attraction.category.entry_kind(),
                attraction,
                attraction.description.clone(),
                attraction.entry_fee * party,
            );
            visit.details = attraction.rating.map(|rating| EntryDetails {
                rating: Some(rating),
                ..Default::default()
            });
            entries.push(visit);
        }

        if let Some(place) = restaurant_for_meal(restaurants, MealType::Lunch, day) {
            entries.push(meal_entry(date, LUNCH_TIME, MealType::Lunch, place, party));
        }
        if let Some(place) = restaurant_for_meal(restaurants, MealType::Dinner, day) {
            entries.push(meal_entry(date, DINNER_TIME, MealType::Dinner, place, party));
        }

        if day < days {
            // Already paid for at check-in.
            entries.push(entry(
                date,
                RETURN_TO_ROOM_TIME,
                EntryKind::Hotel,
                hotel,
                format!("Return to {} for the night", hotel.name),
                0.0,
            ));
        }
    }

    entries.push(entry(
        date_of(days)?,
        DEPARTURE_TIME,
        EntryKind::Transport,
        &home,
        format!(
            "Return by {} from {} to {} ({:.0} km)",
            transport.mode.as_str(),
            trip.destination_name,
            trip.origin.city,
            transport.distance_km
        ),
        transport.total_cost,
    ));

    Ok(entries)
}

fn meal_entry(
    date: NaiveDate,
    time: &str,
    meal: MealType,
    restaurant: &Restaurant,
    party: f64,
) -> ItineraryEntry {
    let description = match &restaurant.cuisine {
        Some(cuisine) => format!("{} at {} ({})", capitalize(meal.as_str()), restaurant.name, cuisine),
        None => format!("{} at {}", capitalize(meal.as_str()), restaurant.name),
    };
    let mut food = entry(
        date,
        time,
        EntryKind::Food,
        restaurant,
        description,
        restaurant.avg_cost * party,
    );
    food.details = restaurant.rating.map(|rating| EntryDetails {
        rating: Some(rating),
        ..Default::default()
    });
    food
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Composes places, weather, advice and transport lookups into a day-by-day
/// costed tour plan.
pub struct ItineraryBuilder {
    places: Arc<dyn PlaceSearchService>,
    weather: Arc<dyn WeatherService>,
    advice: Arc<dyn AdviceService>,
    transport: TransportCostEstimator,
    config: ItineraryGenerationConfig,
}

impl ItineraryBuilder {
    pub fn new(
        places: Arc<dyn PlaceSearchService>,
        weather: Arc<dyn WeatherService>,
        advice: Arc<dyn AdviceService>,
        distance: Arc<dyn GeoDistanceService>,
    ) -> Self {
        Self::with_config(
            places,
            weather,
            advice,
            distance,
            ItineraryGenerationConfig::default(),
        )
    }

    pub fn with_config(
        places: Arc<dyn PlaceSearchService>,
        weather: Arc<dyn WeatherService>,
        advice: Arc<dyn AdviceService>,
        distance: Arc<dyn GeoDistanceService>,
        config: ItineraryGenerationConfig,
    ) -> Self {
        Self {
            places,
            weather,
            advice,
            transport: TransportCostEstimator::new(distance),
            config,
        }
    }

    /// Build a tour plan for `request`.
    ///
    /// Validation runs before any lookup. Weather and tips degrade to
    /// placeholders; an empty hotel, restaurant or attraction list, or a
    /// failed transport estimate, aborts the build.
    pub async fn build(&self, request: &TripRequest) -> Result<TourPlan, PlanError> {
        let trip = request.validate()?;
        info!(
            "Generating tour plan: {} -> {}, {} day(s), party of {}",
            trip.origin.city, trip.destination_name, trip.date_range.number_of_days, trip.party_size
        );

        let destination = trip.destination_coordinates;
        let (attractions, hotels, restaurants, forecast, transport) = futures::join!(
            self.lookup_list(
                "attractions",
                self.places.find_attractions(destination, trip.budget_tier)
            ),
            self.lookup_list(
                "hotels",
                self.places.find_hotels(
                    destination,
                    trip.budget_tier,
                    trip.traveler_type,
                    trip.party_size
                )
            ),
            self.lookup_list(
                "restaurants",
                self.places.find_restaurants(destination, trip.budget_tier)
            ),
            self.lookup_forecast(&trip),
            self.estimate_transport(&trip),
        );

        let transport = transport.map_err(GenerationError::from)?;
        let hotel = hotels
            .first()
            .ok_or(GenerationError::NoResults("hotels"))?;
        if restaurants.is_empty() {
            return Err(GenerationError::NoResults("restaurants").into());
        }
        if attractions.is_empty() {
            return Err(GenerationError::NoResults("attractions").into());
        }

        let tips = self.lookup_tips(&trip, &forecast).await;

        let itinerary = assemble_itinerary(&trip, &transport, hotel, &restaurants, &attractions)?;
        let cost_summary = CostAggregator::aggregate(&itinerary);
        info!(
            "Tour plan for {} assembled: {} entries, total cost {:.2}",
            trip.destination_name,
            itinerary.len(),
            cost_summary.total_cost
        );

        let destination_meta = DestinationMeta {
            name: trip.destination_name.clone(),
            coordinates: destination,
            map_url: destination.map_url(),
            distance_from_origin_km: transport.distance_km,
            hotel_options: hotels.len(),
            restaurant_options: restaurants.len(),
            attraction_options: attractions.len(),
        };

        Ok(TourPlan {
            trip_request: trip,
            itinerary,
            cost_summary,
            tips,
            weather: forecast,
            destination_meta,
        })
    }

    async fn lookup_list<T, F>(&self, label: &'static str, call: F) -> Vec<T>
    where
        F: Future<Output = Result<Vec<T>, ServiceError>>,
    {
        match with_timeout(self.config.lookup_timeout, call).await {
            Ok(items) => {
                info!("Found {} {}", items.len(), label);
                items
            }
            Err(e) => {
                warn!("{} lookup failed: {}. Continuing without {}.", label, e, label);
                Vec::new()
            }
        }
    }

    async fn lookup_forecast(&self, trip: &TripSpec) -> Forecast {
        let call = self.weather.forecast(
            trip.destination_coordinates,
            trip.date_range.start_date,
            trip.date_range.end_date,
        );
        match with_timeout(self.config.lookup_timeout, call).await {
            Ok(forecast) => forecast,
            Err(e) => {
                warn!("Weather lookup failed: {}. Using placeholder forecast.", e);
                Forecast::placeholder()
            }
        }
    }

    async fn lookup_tips(&self, trip: &TripSpec, forecast: &Forecast) -> Vec<Tip> {
        let call = self
            .advice
            .local_tips(&trip.destination_name, trip.traveler_type, forecast);
        match with_timeout(self.config.lookup_timeout, call).await {
            Ok(tips) if !tips.is_empty() => tips,
            Ok(_) => {
                warn!("Advice lookup returned no tips. Using defaults.");
                default_tips()
            }
            Err(e) => {
                warn!("Advice lookup failed: {}. Using defaults.", e);
                default_tips()
            }
        }
    }

    async fn estimate_transport(&self, trip: &TripSpec) -> Result<TransportEstimate, TransportError> {
        let limit = self.config.lookup_timeout;
        let call = self.transport.estimate(
            trip.origin.coordinates,
            trip.destination_coordinates,
            trip.transport_mode,
            trip.party_size,
        );
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(limit)),
        }
    }
}
