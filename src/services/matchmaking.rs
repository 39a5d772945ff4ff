use std::sync::Arc;
use thiserror::Error;
use validator::Validate;
use crate::core::{MatchError, Matcher, DEFAULT_LIMIT};
use crate::models::{
    LikeAction, LikeFilter, MatchStats, NewNotification, Notification, Profile, ProfileFilter,
    ScoredCandidate,
};
use crate::services::cache::{CacheError, CacheKey, CacheManager};
use crate::services::memory::MemoryStore;
use crate::services::store::{LikeStore, NotificationStore, ProfileStore, StoreError};

/// Default page size for notification listings
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 50;

/// Errors surfaced to request handlers
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("{0}")]
    InvalidAction(String),

    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::Validation(errors.to_string())
    }
}

/// Ranked candidates plus the counters reported to clients
#[derive(Debug)]
pub struct RankedMatches {
    pub matches: Vec<ScoredCandidate>,
    pub total_found: usize,
    /// Size of the seen set that was excluded, 0 when exclusion was off
    pub viewed_count: usize,
    pub total_candidates: usize,
}

/// Result of a like/pass
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub action: LikeAction,
    pub is_match: bool,
    pub message: String,
}

/// Matchmaking orchestration
///
/// Fetches the viewer, the seen set and the candidate pool from the injected
/// stores, then hands them to the [`Matcher`]. Also owns the like/pass flow,
/// mutual match detection and match notifications.
pub struct MatchmakingService {
    profiles: Arc<dyn ProfileStore>,
    likes: Arc<dyn LikeStore>,
    notifications: Arc<dyn NotificationStore>,
    cache: Option<Arc<CacheManager>>,
    matcher: Matcher,
    default_limit: i64,
}

impl MatchmakingService {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        likes: Arc<dyn LikeStore>,
        notifications: Arc<dyn NotificationStore>,
        matcher: Matcher,
    ) -> Self {
        Self {
            profiles,
            likes,
            notifications,
            cache: None,
            matcher,
            default_limit: DEFAULT_LIMIT,
        }
    }

    /// Service over a fresh [`MemoryStore`]
    pub fn in_memory(matcher: Matcher) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store.clone(), store, matcher)
    }

    pub fn with_cache(mut self, cache: Arc<CacheManager>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_default_limit(mut self, limit: i64) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn default_limit(&self) -> i64 {
        self.default_limit
    }

    /// Fetch a profile, reading through the cache when one is configured
    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, ServiceError> {
        let key = CacheKey::profile(user_id);

        if let Some(cache) = &self.cache {
            match cache.get::<Profile>(&key).await {
                Ok(profile) => return Ok(profile),
                Err(CacheError::CacheMiss(_)) => {}
                Err(e) => tracing::warn!("Failed to read cached profile {}: {}", user_id, e),
            }
        }

        let profile = self
            .profiles
            .get_profile(user_id)
            .await?
            .ok_or_else(|| MatchError::ProfileNotFound(user_id.to_string()))?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(&key, &profile).await {
                tracing::warn!("Failed to cache profile {}: {}", user_id, e);
            }
        }

        Ok(profile)
    }

    /// Create or replace a profile
    ///
    /// The path id wins; a body id, if given, must agree with it. Returns the
    /// stored profile and whether it was newly created.
    pub async fn upsert_profile(
        &self,
        user_id: &str,
        mut profile: Profile,
    ) -> Result<(Profile, bool), ServiceError> {
        if profile.user_id.is_empty() {
            profile.user_id = user_id.to_string();
        } else if profile.user_id != user_id {
            return Err(ServiceError::Validation(format!(
                "userId {} does not match path id {}",
                profile.user_id, user_id
            )));
        }

        profile.validate()?;

        let created = self.profiles.upsert_profile(profile.clone()).await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.delete(&CacheKey::profile(user_id)).await {
                tracing::warn!("Failed to invalidate cached profile {}: {}", user_id, e);
            }
        }

        tracing::info!(
            "{} profile for user {}",
            if created { "Created" } else { "Updated" },
            user_id
        );

        Ok((profile, created))
    }

    /// Rank potential matches for a viewer
    ///
    /// Fails with `ProfileNotFound` before any scoring if the viewer has no
    /// profile. With `exclude_viewed`, everyone the viewer has liked or
    /// passed is left out of the pool.
    pub async fn potential_matches(
        &self,
        viewer_id: &str,
        limit: i64,
        exclude_viewed: bool,
    ) -> Result<RankedMatches, ServiceError> {
        tracing::info!(
            "Finding potential matches for user: {}, limit: {}, exclude_viewed: {}",
            viewer_id,
            limit,
            exclude_viewed
        );

        let viewer = self.get_profile(viewer_id).await?;

        let seen = if exclude_viewed {
            Some(self.likes.seen_targets(viewer_id).await?)
        } else {
            None
        };
        let viewed_count = seen.as_ref().map_or(0, |s| s.len());

        tracing::debug!("User {} has viewed {} profiles before", viewer_id, viewed_count);

        let filter = ProfileFilter::for_viewer(viewer_id, seen.as_ref());
        let pool = self.profiles.list_profiles(&filter).await?;

        if pool.is_empty() {
            tracing::debug!("No candidates left for {} after exclusion", viewer_id);
        }

        let result = self.matcher.rank(&viewer, pool, seen.as_ref(), limit);

        tracing::info!(
            "Returning {} matches for user {} (from {} candidates)",
            result.matches.len(),
            viewer_id,
            result.total_candidates
        );

        Ok(RankedMatches {
            total_found: result.matches.len(),
            matches: result.matches,
            viewed_count,
            total_candidates: result.total_candidates,
        })
    }

    /// Record a like or pass
    ///
    /// A like is a match when the target has already liked the user back.
    /// Matches flag both records and notify both players.
    pub async fn record_action(
        &self,
        user_id: &str,
        target_user_id: &str,
        action: LikeAction,
    ) -> Result<ActionOutcome, ServiceError> {
        if user_id == target_user_id {
            return Err(ServiceError::InvalidAction(
                "Cannot like or pass your own profile".to_string(),
            ));
        }

        let reciprocal = self.likes.find_like(target_user_id, user_id).await?;
        let already_matched = reciprocal.as_ref().map_or(false, |r| r.is_match);
        let is_match = action == LikeAction::Like
            && reciprocal.map_or(false, |r| r.action == LikeAction::Like);

        self.likes
            .record_like(user_id, target_user_id, action, is_match)
            .await?;

        tracing::info!("User {} {}d user {}", user_id, action.as_str(), target_user_id);

        if is_match && !already_matched {
            self.likes.mark_match(target_user_id, user_id).await?;
            tracing::info!("Match created between {} and {}", user_id, target_user_id);

            // The match is stored at this point; a lost notification must not fail the action
            if let Err(e) = self.notify_match(user_id, target_user_id).await {
                tracing::error!(
                    "Failed to create match notifications for {} and {}: {}",
                    user_id,
                    target_user_id,
                    e
                );
            }
        }

        let message = if is_match {
            "It's a match! 🎉".to_string()
        } else {
            format!("{} recorded successfully", action.as_str())
        };

        Ok(ActionOutcome {
            action,
            is_match,
            message,
        })
    }

    async fn notify_match(&self, user_id: &str, target_user_id: &str) -> Result<(), ServiceError> {
        let user = self.profiles.get_profile(user_id).await?;
        let target = self.profiles.get_profile(target_user_id).await?;

        let (Some(user), Some(target)) = (user, target) else {
            tracing::warn!(
                "Skipping match notifications for {} and {}: profile missing",
                user_id,
                target_user_id
            );
            return Ok(());
        };

        // The target liked first, so they hear about it as a like-back
        self.notifications
            .create_notification(NewNotification::matched(
                target_user_id,
                user_id,
                format!("It's a match! {} liked you back!", user.display_name()),
            ))
            .await?;

        self.notifications
            .create_notification(NewNotification::matched(
                user_id,
                target_user_id,
                format!("It's a match! You and {} liked each other!", target.display_name()),
            ))
            .await?;

        tracing::debug!(
            "Match notifications created for {} and {}",
            user.display_name(),
            target.display_name()
        );

        Ok(())
    }

    /// Profiles of everyone the user has mutually matched with
    pub async fn list_matches(&self, user_id: &str) -> Result<Vec<Profile>, ServiceError> {
        let filter = LikeFilter {
            user_id: Some(user_id.to_string()),
            is_match: Some(true),
            ..LikeFilter::default()
        };
        let matched = self.likes.list_likes(&filter).await?;

        let mut profiles = Vec::with_capacity(matched.len());
        for record in matched {
            match self.profiles.get_profile(&record.target_user_id).await? {
                Some(profile) => profiles.push(profile),
                None => tracing::debug!("Matched profile {} no longer exists", record.target_user_id),
            }
        }

        tracing::info!("Found {} matches for user {}", profiles.len(), user_id);
        Ok(profiles)
    }

    pub async fn stats(&self, user_id: &str) -> Result<MatchStats, ServiceError> {
        let records = self.likes.list_likes(&LikeFilter::by_user(user_id)).await?;
        Ok(MatchStats::from_records(&records))
    }

    /// Seen target ids, sorted for stable output
    pub async fn seen_profiles(&self, user_id: &str) -> Result<Vec<String>, ServiceError> {
        let mut seen: Vec<String> = self.likes.seen_targets(user_id).await?.into_iter().collect();
        seen.sort();
        Ok(seen)
    }

    /// Newest notifications plus the user's total unread count
    pub async fn notifications(
        &self,
        user_id: &str,
        unread_only: bool,
        limit: usize,
    ) -> Result<(Vec<Notification>, u64), ServiceError> {
        let notifications = self
            .notifications
            .list_notifications(user_id, unread_only, limit)
            .await?;
        let unread = self.notifications.unread_count(user_id).await?;
        Ok((notifications, unread))
    }

    pub async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, ServiceError> {
        Ok(self.notifications.create_notification(notification).await?)
    }

    pub async fn unread_count(&self, user_id: &str) -> Result<u64, ServiceError> {
        Ok(self.notifications.unread_count(user_id).await?)
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<Notification, ServiceError> {
        let uuid = parse_notification_id(id)?;
        self.notifications
            .mark_read(uuid)
            .await?
            .ok_or_else(|| ServiceError::NotificationNotFound(id.to_string()))
    }

    pub async fn mark_all_read(&self, user_id: &str) -> Result<u64, ServiceError> {
        Ok(self.notifications.mark_all_read(user_id).await?)
    }

    pub async fn delete_notification(&self, id: &str) -> Result<(), ServiceError> {
        let uuid = parse_notification_id(id)?;
        if self.notifications.delete_notification(uuid).await? {
            Ok(())
        } else {
            Err(ServiceError::NotificationNotFound(id.to_string()))
        }
    }
}

fn parse_notification_id(id: &str) -> Result<uuid::Uuid, ServiceError> {
    uuid::Uuid::parse_str(id).map_err(|_| ServiceError::NotificationNotFound(id.to_string()))
}
