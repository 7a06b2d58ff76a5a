use actix_web::{web, HttpResponse, Responder};
use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;
use std::env;

use crate::db::mongo::ping;
use crate::routes::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: BTreeMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

impl ServiceStatus {
    fn ok(details: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            details: Some(details.into()),
        }
    }

    fn error(details: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            details: Some(details.into()),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}***{}", head, tail)
    } else {
        "***".to_string()
    }
}

fn check_key(var: &str, key: Option<&str>) -> ServiceStatus {
    match key {
        Some(key) => ServiceStatus::ok(format!("{} configured ({})", var, mask(key))),
        None => ServiceStatus::error(format!("{} not configured", var)),
    }
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let config = &state.config;
    let mut services = BTreeMap::new();

    let mongo = match &state.mongo {
        Some(client) => match ping(client).await {
            Ok(()) => ServiceStatus::ok("Connected successfully to MongoDB"),
            Err(e) => {
                warn!("MongoDB health check failed: {}", e);
                ServiceStatus::error(format!("Failed to connect: {}", e))
            }
        },
        None => ServiceStatus::error("MONGODB_URI not configured; plans are not persisted"),
    };
    services.insert("mongodb".to_string(), mongo);

    services.insert(
        "google_maps".to_string(),
        check_key("GOOGLE_MAPS_API_KEY", Some(&config.google_maps_api_key)),
    );
    services.insert(
        "openweather".to_string(),
        check_key("OPENWEATHER_API_KEY", config.openweather_api_key.as_deref()),
    );
    services.insert(
        "gemini".to_string(),
        check_key("GEMINI_API_KEY", config.gemini_api_key.as_deref()),
    );

    let status = if services.values().all(ServiceStatus::is_ok) {
        "ok"
    } else {
        "degraded"
    };

    HttpResponse::Ok().json(HealthStatus {
        status: status.to_string(),
        services,
        environment: env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
