use std::sync::Arc;

use mongodb::Client;

use crate::config::AppConfig;
use crate::services::itinerary_generation_service::ItineraryBuilder;

pub mod health;
pub mod tour_plan;

/// Shared handler state. `mongo` is `None` when persistence is not configured.
pub struct AppState {
    pub builder: Arc<ItineraryBuilder>,
    pub mongo: Option<Arc<Client>>,
    pub config: AppConfig,
}
