//! Billiards Hub matchmaker - player compatibility scoring and candidate ranking
//!
//! This library provides the matching engine used by Billiards Hub. It scores
//! pairs of player profiles on skill, location, game types and availability,
//! ranks candidate pools for a viewer and tracks likes, passes and matches.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_match_score, parse_limit, MatchError, Matcher};
pub use crate::models::{Profile, ScoredCandidate, ScoringWeights, SeenSet};
pub use crate::services::{MatchmakingService, MemoryStore, ServiceError};
