use crate::models::{Profile, ScoredCandidate, ScoringWeights, SeenSet};
use crate::core::{
    filters::exclude_ineligible,
    scoring::calculate_match_score,
};
use thiserror::Error;

/// Number of candidates returned when the caller does not ask for a limit
pub const DEFAULT_LIMIT: i64 = 10;

/// Errors raised before any scoring begins
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Invalid limit: {0:?} is not a number")]
    InvalidLimit(String),
}

/// Parse a textual limit, falling back to `default` when absent
///
/// Negative and zero limits are valid and produce an empty ranking.
pub fn parse_limit(raw: Option<&str>, default: i64) -> Result<i64, MatchError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<i64>()
            .map_err(|_| MatchError::InvalidLimit(value.to_string())),
    }
}

/// Result of the ranking process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<ScoredCandidate>,
    /// Candidates left after exclusion, before the limit was applied
    pub total_candidates: usize,
}

/// Candidate ranking
///
/// # Pipeline Stages
/// 1. Exclude the viewer and, if requested, everyone they have already seen
/// 2. Score every remaining candidate against the viewer
/// 3. Stable sort by score, highest first
/// 4. Truncate to the limit
///
/// The matcher holds no mutable state and can be shared freely across
/// worker threads.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    /// Compatibility of `candidate` from `viewer`'s point of view
    pub fn score(&self, viewer: &Profile, candidate: &Profile) -> u8 {
        calculate_match_score(viewer, candidate, &self.weights)
    }

    /// Rank a candidate pool for a viewer
    ///
    /// # Arguments
    /// * `viewer` - The viewing player's profile
    /// * `pool` - Candidates in retrieval order; equal scores keep this order
    /// * `seen` - Ids to exclude, or `None` to keep previously seen players
    /// * `limit` - Maximum number of candidates; `<= 0` returns nothing
    pub fn rank(
        &self,
        viewer: &Profile,
        pool: Vec<Profile>,
        seen: Option<&SeenSet>,
        limit: i64,
    ) -> MatchResult {
        let candidates = exclude_ineligible(&viewer.user_id, pool, seen);
        let total_candidates = candidates.len();

        if limit <= 0 {
            return MatchResult {
                matches: Vec::new(),
                total_candidates,
            };
        }

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|profile| ScoredCandidate {
                match_score: self.score(viewer, &profile),
                profile,
            })
            .collect();

        // sort_by is stable, ties keep pool order
        scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));

        scored.truncate(usize::try_from(limit).unwrap_or(usize::MAX));

        MatchResult {
            matches: scored,
            total_candidates,
        }
    }

    /// Look up the viewer and rank the pool for them
    ///
    /// Fails with [`MatchError::ProfileNotFound`] before scoring anything if
    /// the lookup has no profile for `viewer_id`.
    pub fn find_matches<F>(
        &self,
        viewer_id: &str,
        lookup: F,
        pool: Vec<Profile>,
        seen: Option<&SeenSet>,
        limit: i64,
    ) -> Result<MatchResult, MatchError>
    where
        F: FnOnce(&str) -> Option<Profile>,
    {
        let viewer = lookup(viewer_id)
            .ok_or_else(|| MatchError::ProfileNotFound(viewer_id.to_string()))?;

        Ok(self.rank(&viewer, pool, seen, limit))
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer() -> Profile {
        Profile::new("viewer", 3.0)
            .with_location("Brisbane")
            .with_game_types(["8-Ball"])
            .with_slots("Monday", ["Evening"])
    }

    fn candidate(id: &str, skill: f64) -> Profile {
        Profile::new(id, skill)
    }

    fn ids(result: &MatchResult) -> Vec<&str> {
        result
            .matches
            .iter()
            .map(|m| m.profile.user_id.as_str())
            .collect()
    }

    #[test]
    fn test_rank_sorted_by_score() {
        let matcher = Matcher::with_default_weights();
        let pool = vec![
            candidate("far", 0.0),
            candidate("close", 3.0),
            candidate("mid", 2.0),
        ];

        let result = matcher.rank(&viewer(), pool, None, 10);

        assert_eq!(ids(&result), vec!["close", "mid", "far"]);
        for pair in result.matches.windows(2) {
            assert!(pair[0].match_score >= pair[1].match_score);
        }
    }

    #[test]
    fn test_ties_keep_pool_order() {
        let matcher = Matcher::with_default_weights();
        let pool = vec![
            candidate("b", 3.0),
            candidate("a", 3.0),
            candidate("c", 3.0),
        ];

        let result = matcher.rank(&viewer(), pool, None, 10);

        assert_eq!(ids(&result), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_limit_zero_and_negative() {
        let matcher = Matcher::with_default_weights();
        let pool = vec![candidate("a", 3.0), candidate("b", 3.0)];

        assert!(matcher.rank(&viewer(), pool.clone(), None, 0).matches.is_empty());
        assert!(matcher.rank(&viewer(), pool, None, -5).matches.is_empty());
    }

    #[test]
    fn test_limit_larger_than_pool() {
        let matcher = Matcher::with_default_weights();
        let pool = vec![candidate("a", 3.0), candidate("b", 3.0)];

        let result = matcher.rank(&viewer(), pool, None, 50);
        assert_eq!(result.matches.len(), 2);
    }

    #[test]
    fn test_respects_limit() {
        let matcher = Matcher::with_default_weights();
        let pool: Vec<Profile> = (0..20)
            .map(|i| candidate(&i.to_string(), (i % 5) as f64))
            .collect();

        let result = matcher.rank(&viewer(), pool, None, 5);

        assert_eq!(result.matches.len(), 5);
        assert_eq!(result.total_candidates, 20);
    }

    #[test]
    fn test_excludes_self_and_seen() {
        let matcher = Matcher::with_default_weights();
        let seen: SeenSet = ["a".to_string()].into_iter().collect();
        let pool = vec![viewer(), candidate("a", 3.0), candidate("b", 3.0)];

        let result = matcher.rank(&viewer(), pool, Some(&seen), 10);

        assert_eq!(ids(&result), vec!["b"]);
        assert_eq!(result.total_candidates, 1);
    }

    #[test]
    fn test_sparse_candidate_still_ranked() {
        let matcher = Matcher::with_default_weights();
        let result = matcher.rank(&viewer(), vec![candidate("bare", 3.0)], None, 10);

        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].match_score, 40);
    }

    #[test]
    fn test_empty_pool() {
        let matcher = Matcher::with_default_weights();
        let result = matcher.rank(&viewer(), Vec::new(), None, 10);

        assert!(result.matches.is_empty());
        assert_eq!(result.total_candidates, 0);
    }

    #[test]
    fn test_find_matches_missing_viewer() {
        let matcher = Matcher::with_default_weights();
        let result = matcher.find_matches("ghost", |_| None, vec![candidate("a", 3.0)], None, 10);

        assert_eq!(result.unwrap_err(), MatchError::ProfileNotFound("ghost".to_string()));
    }

    #[test]
    fn test_find_matches_uses_lookup() {
        let matcher = Matcher::with_default_weights();
        let result = matcher
            .find_matches("viewer", |_| Some(viewer()), vec![candidate("a", 3.0)], None, 10)
            .unwrap();

        assert_eq!(ids(&result), vec!["a"]);
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None, DEFAULT_LIMIT), Ok(10));
        assert_eq!(parse_limit(Some(""), DEFAULT_LIMIT), Ok(10));
        assert_eq!(parse_limit(Some("25"), DEFAULT_LIMIT), Ok(25));
        assert_eq!(parse_limit(Some("-1"), DEFAULT_LIMIT), Ok(-1));
        assert_eq!(
            parse_limit(Some("ten"), DEFAULT_LIMIT),
            Err(MatchError::InvalidLimit("ten".to_string()))
        );
    }
}
