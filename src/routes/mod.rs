// Route exports
pub mod matches;
pub mod notifications;
pub mod profiles;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse, ResponseError};
use crate::core::MatchError;
use crate::models::ErrorResponse;
use crate::services::{ServiceError, StoreError};

pub use matches::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(profiles::configure)
            .configure(notifications::configure),
    );
}

/// JSON body extractor config that answers with an [`ErrorResponse`]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(handle_json_payload_error)
}

/// Query extractor config that answers with an [`ErrorResponse`]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(handle_query_payload_error)
}

fn bad_request(err: impl std::fmt::Debug + std::fmt::Display + 'static, kind: &str, message: String) -> error::Error {
    let body = ErrorResponse {
        error: kind.to_string(),
        message,
        status_code: 400,
    };
    error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> error::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    let message = format!("Invalid JSON: {}", err);
    bad_request(err, "invalid_json", message)
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> error::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    let message = format!("Invalid query: {}", err);
    bad_request(err, "invalid_query", message)
}

impl ServiceError {
    fn label(&self) -> &'static str {
        match self {
            ServiceError::Match(MatchError::ProfileNotFound(_)) => "Profile not found",
            ServiceError::Match(MatchError::InvalidLimit(_)) => "Invalid limit",
            ServiceError::InvalidAction(_) => "Invalid action",
            ServiceError::NotificationNotFound(_) => "Notification not found",
            ServiceError::Validation(_) => "Validation failed",
            ServiceError::Store(StoreError::InvalidInput(_)) => "Invalid input",
            ServiceError::Store(_) => "Internal server error",
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Match(MatchError::ProfileNotFound(_))
            | ServiceError::NotificationNotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Match(MatchError::InvalidLimit(_))
            | ServiceError::InvalidAction(_)
            | ServiceError::Validation(_)
            | ServiceError::Store(StoreError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.label().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}
