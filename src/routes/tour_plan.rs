use actix_web::{http::StatusCode, web, HttpResponse, Responder, ResponseError};
use chrono::Utc;
use log::{error, info, warn};
use bson::{doc, oid::ObjectId, DateTime};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::mongo::{PLANS_COLLECTION, PLANS_DATABASE};
use crate::errors::PlanError;
use crate::fixtures::sample_tour_plan;
use crate::models::{tour_plan::TourPlan, trip_request::TripRequest};
use crate::routes::AppState;

/// A plan as returned over HTTP: the stored id (if any) next to the plan fields.
#[derive(Debug, Serialize, Deserialize)]
pub struct TourPlanResponse {
    pub id: Option<String>,
    #[serde(flatten)]
    pub plan: TourPlan,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredTourPlan {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(flatten)]
    plan: TourPlan,
    created_at: DateTime,
}

impl ResponseError for PlanError {
    fn status_code(&self) -> StatusCode {
        match self {
            PlanError::Validation(_) => StatusCode::BAD_REQUEST,
            PlanError::Generation(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            PlanError::Validation(e) => json!({
                "error": "validation",
                "field": e.field,
                "message": e.message,
            }),
            PlanError::Generation(e) => json!({
                "error": "generation",
                "message": e.to_string(),
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Body extractor config: malformed or mistyped JSON is reported like any
/// other validation failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        let response = HttpResponse::BadRequest().json(json!({
            "error": "validation",
            "field": "body",
            "message": message,
        }));
        actix_web::error::InternalError::from_response(err, response).into()
    })
}

fn plans_collection(client: &Client) -> Collection<StoredTourPlan> {
    client.database(PLANS_DATABASE).collection(PLANS_COLLECTION)
}

async fn persist(client: &Client, plan: &TourPlan) -> mongodb::error::Result<ObjectId> {
    let stored = StoredTourPlan {
        id: ObjectId::new(),
        plan: plan.clone(),
        created_at: DateTime::from_chrono(Utc::now()),
    };
    plans_collection(client).insert_one(&stored).await?;
    Ok(stored.id)
}

/*
    POST /api/tour-plans
*/
pub async fn create(
    request: web::Json<TripRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, PlanError> {
    let plan = state.builder.build(&request.into_inner()).await?;

    let id = match &state.mongo {
        Some(client) => match persist(client, &plan).await {
            Ok(id) => {
                info!("Stored tour plan {}", id);
                Some(id.to_hex())
            }
            Err(e) => {
                error!("Failed to store tour plan: {}", e);
                None
            }
        },
        None => None,
    };

    Ok(HttpResponse::Created().json(TourPlanResponse { id, plan }))
}

/*
    GET /api/tour-plans/{id}
*/
pub async fn get_by_id(path: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let Some(client) = &state.mongo else {
        return HttpResponse::ServiceUnavailable()
            .json(json!({ "error": "persistence", "message": "Plan storage is not configured" }));
    };

    let id = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().json(json!({ "error": "invalid_id", "message": "Invalid ID" })),
    };

    match plans_collection(client).find_one(doc! { "_id": id }).await {
        Ok(Some(stored)) => HttpResponse::Ok().json(TourPlanResponse {
            id: Some(stored.id.to_hex()),
            plan: stored.plan,
        }),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "not_found", "message": "Tour plan not found" })),
        Err(err) => {
            warn!("Failed to retrieve tour plan {}: {}", id, err);
            HttpResponse::InternalServerError()
                .json(json!({ "error": "persistence", "message": "Failed to retrieve tour plan" }))
        }
    }
}

/*
    GET /api/tour-plans/sample
*/
pub async fn sample() -> impl Responder {
    HttpResponse::Ok().json(TourPlanResponse {
        id: None,
        plan: sample_tour_plan(),
    })
}
