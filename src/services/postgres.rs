use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use crate::models::{
    LikeAction, LikeFilter, LikeRecord, NewNotification, Notification, NotificationKind, Profile,
    ProfileFilter,
};
use crate::services::store::{LikeStore, NotificationStore, ProfileStore, StoreError};

/// Action column type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "like_action", rename_all = "lowercase")]
pub enum ActionType {
    Like,
    Pass,
}

impl From<LikeAction> for ActionType {
    fn from(value: LikeAction) -> Self {
        match value {
            LikeAction::Like => ActionType::Like,
            LikeAction::Pass => ActionType::Pass,
        }
    }
}

impl From<ActionType> for LikeAction {
    fn from(value: ActionType) -> Self {
        match value {
            ActionType::Like => LikeAction::Like,
            ActionType::Pass => LikeAction::Pass,
        }
    }
}

/// Notification kind column type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "lowercase")]
pub enum NotificationType {
    Match,
    Like,
    Message,
    System,
}

impl From<NotificationKind> for NotificationType {
    fn from(value: NotificationKind) -> Self {
        match value {
            NotificationKind::Match => NotificationType::Match,
            NotificationKind::Like => NotificationType::Like,
            NotificationKind::Message => NotificationType::Message,
            NotificationKind::System => NotificationType::System,
        }
    }
}

impl From<NotificationType> for NotificationKind {
    fn from(value: NotificationType) -> Self {
        match value {
            NotificationType::Match => NotificationKind::Match,
            NotificationType::Like => NotificationKind::Like,
            NotificationType::Message => NotificationKind::Message,
            NotificationType::System => NotificationKind::System,
        }
    }
}

/// PostgreSQL backend for profiles, the like log and notifications
///
/// Profiles are stored as JSONB documents keyed by user id. A sequence
/// column keeps candidate pools in insertion order.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Connect using optional settings, filling in defaults
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn like_from_row(row: &PgRow) -> Result<LikeRecord, sqlx::Error> {
    let action: ActionType = row.try_get("action")?;
    Ok(LikeRecord {
        user_id: row.try_get("user_id")?,
        target_user_id: row.try_get("target_user_id")?,
        action: action.into(),
        is_match: row.try_get("is_match")?,
        created_at: row.try_get("created_at")?,
    })
}

fn notification_from_row(row: &PgRow) -> Result<Notification, sqlx::Error> {
    let kind: NotificationType = row.try_get("kind")?;
    Ok(Notification {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        kind: kind.into(),
        related_user_id: row.try_get("related_user_id")?,
        message: row.try_get("message")?,
        is_read: row.try_get("is_read")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query("SELECT profile FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row
            .map(|row| row.try_get::<Json<Profile>, _>("profile"))
            .transpose()?
            .map(|Json(profile)| profile))
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<bool, StoreError> {
        if profile.user_id.is_empty() {
            return Err(StoreError::InvalidInput("profile userId is empty".to_string()));
        }

        // xmax is zero only for freshly inserted rows
        let query = r#"
            INSERT INTO profiles (user_id, profile)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET
                profile = EXCLUDED.profile,
                updated_at = NOW()
            RETURNING (xmax = 0) AS inserted
        "#;

        let row = sqlx::query(query)
            .bind(&profile.user_id)
            .bind(Json(&profile))
            .fetch_one(&self.pool)
            .await?;

        let inserted: bool = row.try_get("inserted")?;
        tracing::debug!("Upserted profile {} (created: {})", profile.user_id, inserted);

        Ok(inserted)
    }

    async fn list_profiles(&self, filter: &ProfileFilter) -> Result<Vec<Profile>, StoreError> {
        let excluded: Vec<String> = filter.exclude_user_ids.iter().cloned().collect();

        let query = r#"
            SELECT profile
            FROM profiles
            WHERE NOT (user_id = ANY($1))
            ORDER BY seq
        "#;

        let rows = sqlx::query(query)
            .bind(&excluded)
            .fetch_all(&self.pool)
            .await?;

        let profiles = rows
            .iter()
            .map(|row| row.try_get::<Json<Profile>, _>("profile").map(|Json(p)| p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(profiles)
    }
}

#[async_trait]
impl LikeStore for PostgresStore {
    async fn record_like(
        &self,
        user_id: &str,
        target_user_id: &str,
        action: LikeAction,
        is_match: bool,
    ) -> Result<LikeRecord, StoreError> {
        let query = r#"
            INSERT INTO likes (user_id, target_user_id, action, is_match, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (user_id, target_user_id)
            DO UPDATE SET
                action = EXCLUDED.action,
                is_match = EXCLUDED.is_match,
                created_at = EXCLUDED.created_at
            RETURNING user_id, target_user_id, action, is_match, created_at
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .bind(target_user_id)
            .bind(ActionType::from(action))
            .bind(is_match)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded {} from {} to {} (match: {})",
            action.as_str(),
            user_id,
            target_user_id,
            is_match
        );

        Ok(like_from_row(&row)?)
    }

    async fn find_like(
        &self,
        user_id: &str,
        target_user_id: &str,
    ) -> Result<Option<LikeRecord>, StoreError> {
        let query = r#"
            SELECT user_id, target_user_id, action, is_match, created_at
            FROM likes
            WHERE user_id = $1 AND target_user_id = $2
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .bind(target_user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(like_from_row).transpose()?)
    }

    async fn mark_match(&self, user_id: &str, target_user_id: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE likes SET is_match = TRUE WHERE user_id = $1 AND target_user_id = $2")
            .bind(user_id)
            .bind(target_user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_likes(&self, filter: &LikeFilter) -> Result<Vec<LikeRecord>, StoreError> {
        let query = r#"
            SELECT user_id, target_user_id, action, is_match, created_at
            FROM likes
            WHERE ($1::text IS NULL OR user_id = $1)
              AND ($2::like_action IS NULL OR action = $2)
              AND ($3::bool IS NULL OR is_match = $3)
            ORDER BY created_at
        "#;

        let rows = sqlx::query(query)
            .bind(filter.user_id.as_deref())
            .bind(filter.action.map(ActionType::from))
            .bind(filter.is_match)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(like_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    async fn seen_targets(&self, user_id: &str) -> Result<crate::models::SeenSet, StoreError> {
        let rows = sqlx::query("SELECT target_user_id FROM likes WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let seen = rows
            .iter()
            .map(|row| row.try_get::<String, _>("target_user_id"))
            .collect::<Result<_, _>>()?;

        Ok(seen)
    }
}

#[async_trait]
impl NotificationStore for PostgresStore {
    async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> Result<Notification, StoreError> {
        let notification = notification.into_notification();

        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, kind, related_user_id, message, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(notification.id)
        .bind(&notification.user_id)
        .bind(NotificationType::from(notification.kind))
        .bind(&notification.related_user_id)
        .bind(&notification.message)
        .bind(notification.is_read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(notification)
    }

    async fn list_notifications(
        &self,
        user_id: &str,
        unread_only: bool,
        limit: usize,
    ) -> Result<Vec<Notification>, StoreError> {
        let query = r#"
            SELECT id, user_id, kind, related_user_id, message, is_read, created_at
            FROM notifications
            WHERE user_id = $1 AND (NOT $2 OR is_read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .bind(unread_only)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(notification_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    async fn unread_count(&self, user_id: &str) -> Result<u64, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS unread FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let unread: i64 = row.try_get("unread")?;
        Ok(unread.max(0) as u64)
    }

    async fn mark_read(&self, id: uuid::Uuid) -> Result<Option<Notification>, StoreError> {
        let query = r#"
            UPDATE notifications SET is_read = TRUE
            WHERE id = $1
            RETURNING id, user_id, kind, related_user_id, message, is_read, created_at
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(notification_from_row).transpose()?)
    }

    async fn mark_all_read(&self, user_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_notification(&self, id: uuid::Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
