use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use validator::Validate;

/// Day name -> time slots the player is free in
pub type Availability = BTreeMap<String, BTreeSet<String>>;

/// Target user ids a player has already liked or passed
pub type SeenSet = HashSet<String>;

/// Player profile as read by the matching engine
///
/// Unknown fields in incoming payloads are ignored. Collections that arrive
/// as `null` or are missing decode to empty values, except availability days
/// set to `null`, which are dropped so they never count as a shared day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Profile {
    #[validate(length(min = 1))]
    #[serde(rename = "userId", default)]
    pub user_id: String,
    #[serde(rename = "skillLevel")]
    pub skill_level: f64,
    #[serde(rename = "preferredLocation", default)]
    pub preferred_location: Option<String>,
    #[serde(rename = "preferredGameTypes", default, deserialize_with = "null_as_default")]
    pub preferred_game_types: BTreeSet<String>,
    #[serde(default, deserialize_with = "nullable_availability")]
    pub availability: Availability,
    #[validate(length(max = 50))]
    #[serde(rename = "firstName", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[validate(length(max = 50))]
    #[serde(rename = "lastName", default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[validate(length(max = 500))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "skillTier", default, skip_serializing_if = "Option::is_none")]
    pub skill_tier: Option<String>,
    #[serde(rename = "profileImageUrl", default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

impl Profile {
    pub fn new(user_id: impl Into<String>, skill_level: f64) -> Self {
        Self {
            user_id: user_id.into(),
            skill_level,
            preferred_location: None,
            preferred_game_types: BTreeSet::new(),
            availability: Availability::new(),
            first_name: None,
            last_name: None,
            username: None,
            bio: None,
            skill_tier: None,
            profile_image_url: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.preferred_location = Some(location.into());
        self
    }

    pub fn with_game_types<I, S>(mut self, game_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_game_types = game_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_slots<I, S>(mut self, day: impl Into<String>, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.availability
            .insert(day.into(), slots.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Preferred location, treating blank strings as absent
    pub fn location(&self) -> Option<&str> {
        self.preferred_location
            .as_deref()
            .filter(|location| !location.trim().is_empty())
    }

    /// Name used in notification messages
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("Someone")
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_availability<'de, D>(deserializer: D) -> Result<Availability, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<BTreeSet<String>>>> =
        Option::deserialize(deserializer)?;

    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(day, slots)| slots.map(|slots| (day, slots)))
        .collect())
}

/// Profile paired with its compatibility score against a viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
}

/// Per-factor contributions that sum to the raw score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skill: f64,
    pub location: f64,
    #[serde(rename = "gameTypes")]
    pub game_types: f64,
    pub availability: f64,
}

impl ScoreBreakdown {
    pub fn sum(&self) -> f64 {
        self.skill + self.location + self.game_types + self.availability
    }
}

/// Scoring weights
///
/// The final score always divides by the sum of all four factor weights,
/// including factors that contributed nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub skill: f64,
    pub location: f64,
    pub game_types: f64,
    pub availability: f64,
    /// Fraction of the location weight awarded for two different locations
    pub location_partial_credit: f64,
    /// Skill sub-score points lost per unit of skill gap
    pub skill_gap_penalty: f64,
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.skill + self.location + self.game_types + self.availability
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skill: 40.0,
            location: 25.0,
            game_types: 20.0,
            availability: 15.0,
            location_partial_credit: 0.3,
            skill_gap_penalty: 25.0,
        }
    }
}

/// Candidate pool query
#[derive(Debug, Clone, Default)]
pub struct ProfileFilter {
    pub exclude_user_ids: HashSet<String>,
}

impl ProfileFilter {
    /// Everyone except the viewer, and optionally everyone they have seen
    pub fn for_viewer(viewer_id: &str, seen: Option<&SeenSet>) -> Self {
        let mut exclude_user_ids: HashSet<String> = seen.cloned().unwrap_or_default();
        exclude_user_ids.insert(viewer_id.to_string());
        Self { exclude_user_ids }
    }

    pub fn admits(&self, profile: &Profile) -> bool {
        !self.exclude_user_ids.contains(&profile.user_id)
    }
}

/// Like or pass on another player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    Like,
    Pass,
}

impl LikeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeAction::Like => "like",
            LikeAction::Pass => "pass",
        }
    }
}

impl std::str::FromStr for LikeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "like" => Ok(LikeAction::Like),
            "pass" => Ok(LikeAction::Pass),
            other => Err(format!("Invalid action \"{}\". Must be \"like\" or \"pass\"", other)),
        }
    }
}

/// Recorded like/pass between two players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeRecord {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "likedProfileId")]
    pub target_user_id: String,
    pub action: LikeAction,
    #[serde(rename = "isMatch")]
    pub is_match: bool,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Like log query
#[derive(Debug, Clone, Default)]
pub struct LikeFilter {
    pub user_id: Option<String>,
    pub action: Option<LikeAction>,
    pub is_match: Option<bool>,
}

impl LikeFilter {
    pub fn by_user(user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &LikeRecord) -> bool {
        self.user_id.as_deref().map_or(true, |id| record.user_id == id)
            && self.action.map_or(true, |action| record.action == action)
            && self.is_match.map_or(true, |is_match| record.is_match == is_match)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Match,
    Like,
    Message,
    System,
}

/// In-app notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: uuid::Uuid,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(rename = "relatedUserId")]
    pub related_user_id: String,
    pub message: String,
    #[serde(rename = "isRead")]
    pub is_read: bool,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Notification to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: String,
    pub kind: NotificationKind,
    pub related_user_id: String,
    pub message: String,
    pub is_read: bool,
}

impl NewNotification {
    pub fn matched(user_id: &str, related_user_id: &str, message: String) -> Self {
        Self {
            user_id: user_id.to_string(),
            kind: NotificationKind::Match,
            related_user_id: related_user_id.to_string(),
            message,
            is_read: false,
        }
    }

    pub fn into_notification(self) -> Notification {
        Notification {
            id: uuid::Uuid::new_v4(),
            user_id: self.user_id,
            kind: self.kind,
            related_user_id: self.related_user_id,
            message: self.message,
            is_read: self.is_read,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Like/pass counters for a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    #[serde(rename = "totalLikes")]
    pub total_likes: u64,
    #[serde(rename = "totalMatches")]
    pub total_matches: u64,
    #[serde(rename = "totalPasses")]
    pub total_passes: u64,
    /// Percentage of likes that became matches, one decimal place
    #[serde(rename = "matchRate")]
    pub match_rate: f64,
    #[serde(rename = "totalActions")]
    pub total_actions: u64,
}

impl MatchStats {
    pub fn from_records(records: &[LikeRecord]) -> Self {
        let total_likes = records
            .iter()
            .filter(|r| r.action == LikeAction::Like)
            .count() as u64;
        let total_passes = records
            .iter()
            .filter(|r| r.action == LikeAction::Pass)
            .count() as u64;
        let total_matches = records.iter().filter(|r| r.is_match).count() as u64;

        let match_rate = if total_likes > 0 {
            (total_matches as f64 / total_likes as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };

        Self {
            total_likes,
            total_matches,
            total_passes,
            match_rate,
            total_actions: total_likes + total_passes,
        }
    }
}
