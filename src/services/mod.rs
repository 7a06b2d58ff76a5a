pub mod advice_service;
pub mod cost_aggregator;
pub mod distance_service;
pub mod interfaces;
pub mod itinerary_generation_service;
pub mod places_service;
pub mod plan_text_parser;
pub mod transport_cost_service;
pub mod weather_service;
