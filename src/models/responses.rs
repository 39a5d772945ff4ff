use serde::{Deserialize, Serialize};
use crate::models::domain::{LikeAction, MatchStats, Notification, Profile, ScoredCandidate};

/// Response for the potential matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PotentialMatchesResponse {
    pub success: bool,
    pub matches: Vec<ScoredCandidate>,
    #[serde(rename = "totalFound")]
    pub total_found: usize,
    #[serde(rename = "viewedCount")]
    pub viewed_count: usize,
    #[serde(rename = "requestTime")]
    pub request_time: chrono::DateTime<chrono::Utc>,
}

/// Response for a like/pass action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub action: LikeAction,
    #[serde(rename = "isMatch")]
    pub is_match: bool,
    pub message: String,
}

/// Mutual matches of a player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub success: bool,
    pub matches: Vec<Profile>,
    #[serde(rename = "totalMatches")]
    pub total_matches: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: MatchStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeenProfilesResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "seenProfiles")]
    pub seen_profiles: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub data: Profile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsResponse {
    pub success: bool,
    pub notifications: Vec<Notification>,
    #[serde(rename = "unreadCount")]
    pub unread_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub success: bool,
    pub notification: Notification,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}

/// Plain acknowledgement, optionally carrying how many records changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "modifiedCount", skip_serializing_if = "Option::is_none")]
    pub modified_count: Option<u64>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
