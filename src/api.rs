use crate::db::Database;
use crate::error::ServiceError;
use crate::service::ReviewService;
use actix_web::error::{Error, InternalError, JsonPayloadError};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};

pub type SharedService = web::Data<ReviewService<Database>>;

const TEXT_REQUIRED: &str = "Field 'text' is required";

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ReviewFilter {
    pub sentiment: Option<String>,
}

/// Mounts the review routes and the JSON body settings they rely on.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/reviews", web::post().to(create_review))
        .route("/reviews", web::get().to(get_reviews))
        .route("/health", web::get().to(health));
}

// Unreadable bodies get the same answer as a body without `text`
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    warn!("[API] Rejected request body: {}", err);
    let response = HttpResponse::BadRequest().json(json!({ "error": TEXT_REQUIRED }));
    InternalError::from_response(err, response).into()
}

pub async fn create_review(service: SharedService, body: web::Json<Value>) -> HttpResponse {
    let text = match body.get("text").and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            warn!("[API] Review request without usable text");
            return HttpResponse::BadRequest().json(json!({ "error": TEXT_REQUIRED }));
        }
    };

    match service.add(text).await {
        Ok(review) => {
            info!("[API] Stored review {} as {}", review.id, review.sentiment);
            HttpResponse::Created().json(review)
        }
        Err(ServiceError::Validation(msg)) => {
            warn!("[API] Validation failed: {}", msg);
            HttpResponse::BadRequest().json(json!({ "error": TEXT_REQUIRED }))
        }
        Err(err) => {
            error!("[API] Failed to store review: {}", err);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to store review" }))
        }
    }
}

pub async fn get_reviews(service: SharedService, query: web::Query<ReviewFilter>) -> HttpResponse {
    let filter = query.sentiment.as_deref().unwrap_or("");

    match service.list(filter).await {
        Ok(reviews) => {
            info!("[API] Returning {} reviews for filter '{}'", reviews.len(), filter);
            HttpResponse::Ok().json(reviews)
        }
        Err(err) => {
            error!("[API] Failed to fetch reviews for '{}': {}", filter, err);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch reviews" }))
        }
    }
}

pub async fn health(service: SharedService) -> HttpResponse {
    match service.store().count().await {
        Ok(count) => HttpResponse::Ok().json(json!({ "status": "ok", "reviews": count })),
        Err(err) => {
            error!("[API] Health check failed: {}", err);
            HttpResponse::InternalServerError().json(json!({ "status": "error" }))
        }
    }
}
