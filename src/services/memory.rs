use async_trait::async_trait;
use tokio::sync::RwLock;
use crate::models::{
    LikeAction, LikeFilter, LikeRecord, NewNotification, Notification, Profile, ProfileFilter,
};
use crate::services::store::{LikeStore, NotificationStore, ProfileStore, StoreError};

/// In-memory backend for all stores
///
/// Used for local development and tests. Each collection is a vector so
/// profiles come back in the order they were first inserted.
#[derive(Default)]
pub struct MemoryStore {
    profiles: RwLock<Vec<Profile>>,
    likes: RwLock<Vec<LikeRecord>>,
    notifications: RwLock<Vec<Notification>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<bool, StoreError> {
        if profile.user_id.is_empty() {
            return Err(StoreError::InvalidInput("profile userId is empty".to_string()));
        }

        let mut profiles = self.profiles.write().await;
        match profiles.iter_mut().find(|p| p.user_id == profile.user_id) {
            Some(existing) => {
                *existing = profile;
                Ok(false)
            }
            None => {
                profiles.push(profile);
                Ok(true)
            }
        }
    }

    async fn list_profiles(&self, filter: &ProfileFilter) -> Result<Vec<Profile>, StoreError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().filter(|p| filter.admits(p)).cloned().collect())
    }
}

#[async_trait]
impl LikeStore for MemoryStore {
    async fn record_like(
        &self,
        user_id: &str,
        target_user_id: &str,
        action: LikeAction,
        is_match: bool,
    ) -> Result<LikeRecord, StoreError> {
        let record = LikeRecord {
            user_id: user_id.to_string(),
            target_user_id: target_user_id.to_string(),
            action,
            is_match,
            created_at: chrono::Utc::now(),
        };

        let mut likes = self.likes.write().await;
        match likes
            .iter_mut()
            .find(|r| r.user_id == user_id && r.target_user_id == target_user_id)
        {
            Some(existing) => *existing = record.clone(),
            None => likes.push(record.clone()),
        }

        Ok(record)
    }

    async fn find_like(
        &self,
        user_id: &str,
        target_user_id: &str,
    ) -> Result<Option<LikeRecord>, StoreError> {
        let likes = self.likes.read().await;
        Ok(likes
            .iter()
            .find(|r| r.user_id == user_id && r.target_user_id == target_user_id)
            .cloned())
    }

    async fn mark_match(&self, user_id: &str, target_user_id: &str) -> Result<(), StoreError> {
        let mut likes = self.likes.write().await;
        if let Some(record) = likes
            .iter_mut()
            .find(|r| r.user_id == user_id && r.target_user_id == target_user_id)
        {
            record.is_match = true;
        }
        Ok(())
    }

    async fn list_likes(&self, filter: &LikeFilter) -> Result<Vec<LikeRecord>, StoreError> {
        let likes = self.likes.read().await;
        Ok(likes.iter().filter(|r| filter.matches(r)).cloned().collect())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, StoreError> {
        let notification = notification.into_notification();
        self.notifications.write().await.push(notification.clone());
        Ok(notification)
    }

    async fn list_notifications(
        &self,
        user_id: &str,
        unread_only: bool,
        limit: usize,
    ) -> Result<Vec<Notification>, StoreError> {
        let notifications = self.notifications.read().await;
        // Stored oldest first
        Ok(notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.is_read))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn unread_count(&self, user_id: &str) -> Result<u64, StoreError> {
        let notifications = self.notifications.read().await;
        Ok(notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as u64)
    }

    async fn mark_read(&self, id: uuid::Uuid) -> Result<Option<Notification>, StoreError> {
        let mut notifications = self.notifications.write().await;
        Ok(notifications.iter_mut().find(|n| n.id == id).map(|n| {
            n.is_read = true;
            n.clone()
        }))
    }

    async fn mark_all_read(&self, user_id: &str) -> Result<u64, StoreError> {
        let mut notifications = self.notifications.write().await;
        let mut modified = 0;
        for notification in notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            notification.is_read = true;
            modified += 1;
        }
        Ok(modified)
    }

    async fn delete_notification(&self, id: uuid::Uuid) -> Result<bool, StoreError> {
        let mut notifications = self.notifications.write().await;
        let before = notifications.len();
        notifications.retain(|n| n.id != id);
        Ok(notifications.len() < before)
    }
}
