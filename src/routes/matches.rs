use actix_web::{web, HttpResponse};
use validator::Validate;
use crate::core::parse_limit;
use crate::models::{
    ActionRequest, ActionResponse, HealthResponse, LikeAction, MatchesResponse,
    PotentialMatchesQuery, PotentialMatchesResponse, SeenProfilesResponse, StatsResponse,
};
use crate::services::{MatchmakingService, PostgresStore, ServiceError};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MatchmakingService>,
    /// Present when running against PostgreSQL, for health reporting
    pub postgres: Option<Arc<PostgresStore>>,
}

impl AppState {
    pub fn new(service: MatchmakingService) -> Self {
        Self {
            service: Arc::new(service),
            postgres: None,
        }
    }

    pub fn with_postgres(mut self, postgres: Arc<PostgresStore>) -> Self {
        self.postgres = Some(postgres);
        self
    }
}

/// Configure health and matchmaking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matchmaking/action", web::post().to(record_action))
        .route("/matchmaking/{user_id}/potential-matches", web::get().to(potential_matches))
        .route("/matchmaking/{user_id}/matches", web::get().to(list_matches))
        .route("/matchmaking/{user_id}/stats", web::get().to(match_stats))
        .route("/matchmaking/{user_id}/seen", web::get().to(seen_profiles));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let healthy = match &state.postgres {
        Some(postgres) => postgres.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Ranked potential matches
///
/// GET /api/v1/matchmaking/{userId}/potential-matches?limit=10&excludeViewed=true
async fn potential_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PotentialMatchesQuery>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();
    let limit = parse_limit(query.limit.as_deref(), state.service.default_limit())?;
    let exclude_viewed = query.exclude_viewed.unwrap_or(true);

    let ranked = state
        .service
        .potential_matches(&user_id, limit, exclude_viewed)
        .await?;

    Ok(HttpResponse::Ok().json(PotentialMatchesResponse {
        success: true,
        matches: ranked.matches,
        total_found: ranked.total_found,
        viewed_count: ranked.viewed_count,
        request_time: chrono::Utc::now(),
    }))
}

/// Record a like or pass
///
/// POST /api/v1/matchmaking/action
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "targetUserId": "string",
///   "action": "like|pass"
/// }
/// ```
async fn record_action(
    state: web::Data<AppState>,
    req: web::Json<ActionRequest>,
) -> Result<HttpResponse, ServiceError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for action request: {:?}", errors);
        return Err(errors.into());
    }

    let action: LikeAction = req.action.parse().map_err(ServiceError::InvalidAction)?;

    let outcome = state
        .service
        .record_action(&req.user_id, &req.target_user_id, action)
        .await?;

    Ok(HttpResponse::Ok().json(ActionResponse {
        success: true,
        action: outcome.action,
        is_match: outcome.is_match,
        message: outcome.message,
    }))
}

async fn list_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let matches = state.service.list_matches(&path).await?;

    Ok(HttpResponse::Ok().json(MatchesResponse {
        success: true,
        total_matches: matches.len(),
        matches,
    }))
}

async fn match_stats(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let stats = state.service.stats(&path).await?;
    Ok(HttpResponse::Ok().json(StatsResponse { success: true, stats }))
}

/// Profile ids the user has already liked or passed
async fn seen_profiles(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();
    let seen = state.service.seen_profiles(&user_id).await?;

    Ok(HttpResponse::Ok().json(SeenProfilesResponse {
        user_id,
        count: seen.len(),
        seen_profiles: seen,
    }))
}
