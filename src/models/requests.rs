use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::NotificationKind;

/// Query string for the potential matches endpoint
///
/// `limit` stays textual so a non-numeric value can be reported as an
/// invalid limit instead of a generic query error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PotentialMatchesQuery {
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(rename = "excludeViewed", default)]
    pub exclude_viewed: Option<bool>,
}

/// Request to record a like or pass
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ActionRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
    pub action: String,
}

/// Request to create a notification
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[validate(length(min = 1))]
    #[serde(rename = "relatedUserId")]
    pub related_user_id: String,
    #[validate(length(min = 1, max = 500))]
    pub message: String,
    #[serde(rename = "isRead", default)]
    pub is_read: bool,
}

/// Query string for listing notifications
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationsQuery {
    #[serde(rename = "unreadOnly", default)]
    pub unread_only: Option<bool>,
    #[serde(default)]
    pub limit: Option<String>,
}
