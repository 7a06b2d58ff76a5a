use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info, warn};

use tourplan_api::{
    config::AppConfig,
    db,
    routes::{self, AppState},
    services::{
        advice_service::GeminiAdviceService,
        distance_service::GoogleDistanceService,
        itinerary_generation_service::{ItineraryBuilder, ItineraryGenerationConfig},
        places_service::GooglePlacesService,
        weather_service::OpenWeatherService,
    },
};

fn startup_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        startup_error(e)
    })?;

    let mongo = match &config.mongodb_uri {
        Some(uri) => match db::mongo::create_mongo_client(uri).await {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("MongoDB unavailable ({}). Plans will not be persisted.", e);
                None
            }
        },
        None => {
            info!("MONGODB_URI not set; plans will not be persisted");
            None
        }
    };

    let places = GooglePlacesService::new(&config).map_err(startup_error)?;
    let weather = OpenWeatherService::new(&config).map_err(startup_error)?;
    let advice = GeminiAdviceService::new(&config).map_err(startup_error)?;
    let distance = GoogleDistanceService::new(&config, mongo.clone()).map_err(startup_error)?;

    let builder = Arc::new(ItineraryBuilder::with_config(
        Arc::new(places),
        Arc::new(weather),
        Arc::new(advice),
        Arc::new(distance),
        ItineraryGenerationConfig {
            lookup_timeout: config.lookup_timeout(),
        },
    ));

    let host = config.host.clone();
    let port = config.port;
    let state = web::Data::new(AppState {
        builder,
        mongo,
        config,
    });

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(routes::tour_plan::json_config())
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api/tour-plans")
                    .route("", web::post().to(routes::tour_plan::create))
                    .route("/sample", web::get().to(routes::tour_plan::sample))
                    .route("/{id}", web::get().to(routes::tour_plan::get_by_id)),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
