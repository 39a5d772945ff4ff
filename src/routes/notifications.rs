use actix_web::{web, HttpResponse};
use validator::Validate;
use crate::core::parse_limit;
use crate::models::{
    CreateNotificationRequest, MessageResponse, NewNotification, NotificationResponse,
    NotificationsQuery, NotificationsResponse, UnreadCountResponse,
};
use crate::routes::AppState;
use crate::services::matchmaking::DEFAULT_NOTIFICATION_LIMIT;
use crate::services::ServiceError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/notifications", web::post().to(create_notification))
        .route("/notifications/{user_id}", web::get().to(list_notifications))
        .route("/notifications/{user_id}/unread-count", web::get().to(unread_count))
        .route("/notifications/{user_id}/mark-all-read", web::patch().to(mark_all_read))
        .route("/notifications/{id}/read", web::patch().to(mark_read))
        .route("/notifications/{id}", web::delete().to(delete_notification));
}

/// GET /api/v1/notifications/{userId}?unreadOnly=false&limit=50
async fn list_notifications(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<NotificationsQuery>,
) -> Result<HttpResponse, ServiceError> {
    let limit = parse_limit(query.limit.as_deref(), DEFAULT_NOTIFICATION_LIMIT as i64)?;
    let limit = usize::try_from(limit).unwrap_or(0);

    let (notifications, unread_count) = state
        .service
        .notifications(&path, query.unread_only.unwrap_or(false), limit)
        .await?;

    Ok(HttpResponse::Ok().json(NotificationsResponse {
        success: true,
        notifications,
        unread_count,
    }))
}

async fn create_notification(
    state: web::Data<AppState>,
    req: web::Json<CreateNotificationRequest>,
) -> Result<HttpResponse, ServiceError> {
    req.validate()?;

    let req = req.into_inner();
    let notification = state
        .service
        .create_notification(NewNotification {
            user_id: req.user_id,
            kind: req.kind,
            related_user_id: req.related_user_id,
            message: req.message,
            is_read: req.is_read,
        })
        .await?;

    Ok(HttpResponse::Created().json(NotificationResponse {
        success: true,
        notification,
    }))
}

async fn unread_count(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let count = state.service.unread_count(&path).await?;
    Ok(HttpResponse::Ok().json(UnreadCountResponse { count }))
}

async fn mark_read(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let notification = state.service.mark_notification_read(&path).await?;
    Ok(HttpResponse::Ok().json(NotificationResponse {
        success: true,
        notification,
    }))
}

async fn mark_all_read(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let modified = state.service.mark_all_read(&path).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: "All notifications marked as read".to_string(),
        modified_count: Some(modified),
    }))
}

async fn delete_notification(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    state.service.delete_notification(&path).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: "Notification deleted".to_string(),
        modified_count: None,
    }))
}
