use actix_web::{web, HttpResponse};
use crate::models::{Profile, ProfileResponse};
use crate::routes::AppState;
use crate::services::ServiceError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profiles/{user_id}", web::get().to(get_profile))
        .route("/profiles/{user_id}", web::put().to(upsert_profile));
}

async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let profile = state.service.get_profile(&path).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse {
        success: true,
        data: profile,
    }))
}

/// Create or replace a profile
///
/// PUT /api/v1/profiles/{userId}
///
/// Responds 201 when the profile is new and 200 when it replaced one.
async fn upsert_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Profile>,
) -> Result<HttpResponse, ServiceError> {
    let (profile, created) = state
        .service
        .upsert_profile(&path, body.into_inner())
        .await?;

    let response = ProfileResponse {
        success: true,
        data: profile,
    };

    Ok(if created {
        HttpResponse::Created().json(response)
    } else {
        HttpResponse::Ok().json(response)
    })
}
