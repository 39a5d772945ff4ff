use crate::models::{Profile, SeenSet};

/// Check if a profile may appear in a viewer's candidate list
///
/// The viewer never sees themselves. When a seen set is supplied, anyone in
/// it is excluded as well.
#[inline]
pub fn is_eligible_candidate(viewer_id: &str, profile: &Profile, seen: Option<&SeenSet>) -> bool {
    if profile.user_id == viewer_id {
        return false;
    }

    match seen {
        Some(seen) => !seen.contains(&profile.user_id),
        None => true,
    }
}

/// Drop ineligible profiles while keeping the pool's retrieval order
pub fn exclude_ineligible(
    viewer_id: &str,
    pool: Vec<Profile>,
    seen: Option<&SeenSet>,
) -> Vec<Profile> {
    pool.into_iter()
        .filter(|profile| is_eligible_candidate(viewer_id, profile, seen))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seen(ids: &[&str]) -> SeenSet {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_self_is_never_eligible() {
        let me = Profile::new("me", 3.0);
        assert!(!is_eligible_candidate("me", &me, None));
        assert!(!is_eligible_candidate("me", &me, Some(&seen(&[]))));
    }

    #[test]
    fn test_seen_profiles_excluded_only_when_requested() {
        let other = Profile::new("other", 3.0);
        let seen = seen(&["other"]);

        assert!(!is_eligible_candidate("me", &other, Some(&seen)));
        assert!(is_eligible_candidate("me", &other, None));
    }

    #[test]
    fn test_exclusion_preserves_order() {
        let pool = vec![
            Profile::new("c", 1.0),
            Profile::new("me", 1.0),
            Profile::new("a", 1.0),
            Profile::new("b", 1.0),
        ];

        let kept = exclude_ineligible("me", pool, Some(&seen(&["a"])));
        let ids: Vec<&str> = kept.iter().map(|p| p.user_id.as_str()).collect();

        assert_eq!(ids, vec!["c", "b"]);
    }
}
