use async_trait::async_trait;
use thiserror::Error;
use crate::models::{
    LikeAction, LikeFilter, LikeRecord, NewNotification, Notification, Profile, ProfileFilter,
    SeenSet,
};

/// Errors that can occur in any store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Profile persistence
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError>;

    /// Insert or replace a profile, returning `true` if it was newly created
    async fn upsert_profile(&self, profile: Profile) -> Result<bool, StoreError>;

    /// Profiles admitted by `filter`, in insertion order
    async fn list_profiles(&self, filter: &ProfileFilter) -> Result<Vec<Profile>, StoreError>;
}

/// Like/pass log
#[async_trait]
pub trait LikeStore: Send + Sync {
    /// Record an action; a repeated action on the same target replaces the old one
    async fn record_like(
        &self,
        user_id: &str,
        target_user_id: &str,
        action: LikeAction,
        is_match: bool,
    ) -> Result<LikeRecord, StoreError>;

    async fn find_like(
        &self,
        user_id: &str,
        target_user_id: &str,
    ) -> Result<Option<LikeRecord>, StoreError>;

    /// Flag an existing record as a mutual match
    async fn mark_match(&self, user_id: &str, target_user_id: &str) -> Result<(), StoreError>;

    async fn list_likes(&self, filter: &LikeFilter) -> Result<Vec<LikeRecord>, StoreError>;

    /// Every target the user has liked or passed
    async fn seen_targets(&self, user_id: &str) -> Result<SeenSet, StoreError> {
        let records = self.list_likes(&LikeFilter::by_user(user_id)).await?;
        Ok(records.into_iter().map(|r| r.target_user_id).collect())
    }
}

/// Notification inbox
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, StoreError>;

    /// Newest first
    async fn list_notifications(
        &self,
        user_id: &str,
        unread_only: bool,
        limit: usize,
    ) -> Result<Vec<Notification>, StoreError>;

    async fn unread_count(&self, user_id: &str) -> Result<u64, StoreError>;

    async fn mark_read(&self, id: uuid::Uuid) -> Result<Option<Notification>, StoreError>;

    /// Returns how many notifications changed
    async fn mark_all_read(&self, user_id: &str) -> Result<u64, StoreError>;

    async fn delete_notification(&self, id: uuid::Uuid) -> Result<bool, StoreError>;
}
