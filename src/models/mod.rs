// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Availability, LikeAction, LikeFilter, LikeRecord, MatchStats, NewNotification, Notification,
    NotificationKind, Profile, ProfileFilter, ScoreBreakdown, ScoredCandidate, ScoringWeights,
    SeenSet,
};
pub use requests::{ActionRequest, CreateNotificationRequest, NotificationsQuery, PotentialMatchesQuery};
pub use responses::{
    ActionResponse, ErrorResponse, HealthResponse, MatchesResponse, MessageResponse,
    NotificationResponse, NotificationsResponse, PotentialMatchesResponse, ProfileResponse,
    SeenProfilesResponse, StatsResponse, UnreadCountResponse,
};
