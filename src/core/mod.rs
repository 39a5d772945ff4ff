// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use filters::{exclude_ineligible, is_eligible_candidate};
pub use matcher::{parse_limit, MatchError, MatchResult, Matcher, DEFAULT_LIMIT};
pub use scoring::{calculate_match_score, calculate_score_breakdown};
