use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse, web};

use crate::dto::api::ErrorResponse;
use crate::services::ServiceError;

pub mod categories;
pub mod main;
pub mod scrape;

/// Map a service failure onto a JSON error response.
pub fn service_error_response(err: ServiceError, not_found: &str) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().json(ErrorResponse::new(not_found)),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            HttpResponse::BadRequest().json(ErrorResponse::new(message))
        }
        ServiceError::Internal => {
            HttpResponse::InternalServerError().json(ErrorResponse::new("Internal server error"))
        }
    }
}

/// JSON extractor settings that answer malformed bodies with the usual
/// error envelope instead of a plain-text 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}
