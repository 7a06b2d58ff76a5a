pub mod geo;
pub mod itinerary;
pub mod places;
pub mod tour_plan;
pub mod trip_request;
pub mod weather;
