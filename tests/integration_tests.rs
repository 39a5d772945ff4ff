// Integration tests for candidate ranking and the matchmaking flow

use billiards_matchmaker::core::{MatchError, Matcher};
use billiards_matchmaker::models::{LikeAction, Profile, SeenSet};
use billiards_matchmaker::services::{MatchmakingService, ServiceError};

fn create_test_profile(id: &str, skill: f64, location: &str, game_types: &[&str]) -> Profile {
    Profile::new(id, skill)
        .with_location(location)
        .with_game_types(game_types.iter().copied())
        .with_slots("Friday", ["Evening"])
}

fn create_pool() -> Vec<Profile> {
    vec![
        create_test_profile("far", 3.0, "Sydney", &["8-Ball"]),            // partial location
        create_test_profile("twin", 3.0, "Brisbane", &["8-Ball"]),         // perfect
        create_test_profile("twin2", 3.0, "Brisbane", &["8-Ball"]),        // perfect, later
        create_test_profile("novice", 0.5, "Brisbane", &["Snooker"]),      // skill gap
        create_test_profile("viewer", 3.0, "Brisbane", &["8-Ball"]),       // self
    ]
}

#[test]
fn test_integration_end_to_end_ranking() {
    let matcher = Matcher::with_default_weights();
    let viewer = create_test_profile("viewer", 3.0, "Brisbane", &["8-Ball"]);

    let result = matcher.rank(&viewer, create_pool(), None, 10);

    let ids: Vec<&str> = result.matches.iter().map(|m| m.profile.user_id.as_str()).collect();
    assert_eq!(ids, vec!["twin", "twin2", "far", "novice"]);
    assert_eq!(result.total_candidates, 4);

    for pair in result.matches.windows(2) {
        assert!(pair[0].match_score >= pair[1].match_score);
    }
}

#[test]
fn test_integration_seen_set_excluded() {
    let matcher = Matcher::with_default_weights();
    let viewer = create_test_profile("viewer", 3.0, "Brisbane", &["8-Ball"]);
    let seen: SeenSet = ["twin".to_string(), "novice".to_string()].into_iter().collect();

    let result = matcher.rank(&viewer, create_pool(), Some(&seen), 10);

    for scored in &result.matches {
        assert_ne!(scored.profile.user_id, "viewer");
        assert!(!seen.contains(&scored.profile.user_id));
    }
    assert_eq!(result.matches.len(), 2);
}

#[test]
fn test_integration_limit_zero_and_negative() {
    let matcher = Matcher::with_default_weights();
    let viewer = create_test_profile("viewer", 3.0, "Brisbane", &["8-Ball"]);

    assert!(matcher.rank(&viewer, create_pool(), None, 0).matches.is_empty());
    assert!(matcher.rank(&viewer, create_pool(), None, -5).matches.is_empty());
    assert_eq!(matcher.rank(&viewer, create_pool(), None, 1).matches.len(), 1);
}

#[test]
fn test_integration_missing_viewer() {
    let matcher = Matcher::with_default_weights();
    let result = matcher.find_matches("ghost", |_| None, create_pool(), None, 10);
    assert_eq!(result.unwrap_err(), MatchError::ProfileNotFound("ghost".to_string()));
}

async fn seeded_service() -> MatchmakingService {
    let service = MatchmakingService::in_memory(Matcher::with_default_weights());
    for profile in create_pool() {
        let id = profile.user_id.clone();
        service.upsert_profile(&id, profile).await.unwrap();
    }
    service
}

#[test]
fn test_integration_service_ranking_blocking() {
    tokio_test::block_on(async {
        let service = seeded_service().await;

        let ranked = service.potential_matches("viewer", 2, true).await.unwrap();
        assert_eq!(ranked.total_found, 2);
        assert_eq!(ranked.matches[0].profile.user_id, "twin");
        assert_eq!(ranked.matches[0].match_score, 100);
        assert_eq!(ranked.viewed_count, 0);
    });
}

#[tokio::test]
async fn test_integration_like_flow() {
    let service = seeded_service().await;

    // viewer passes on twin, likes far
    service.record_action("viewer", "twin", LikeAction::Pass).await.unwrap();
    let liked = service.record_action("viewer", "far", LikeAction::Like).await.unwrap();
    assert!(!liked.is_match);

    let ranked = service.potential_matches("viewer", 10, true).await.unwrap();
    let ids: Vec<&str> = ranked.matches.iter().map(|m| m.profile.user_id.as_str()).collect();
    assert_eq!(ids, vec!["twin2", "novice"]);
    assert_eq!(ranked.viewed_count, 2);

    // far likes back
    let back = service.record_action("far", "viewer", LikeAction::Like).await.unwrap();
    assert!(back.is_match);

    let viewer_matches = service.list_matches("viewer").await.unwrap();
    assert_eq!(viewer_matches.len(), 1);
    assert_eq!(viewer_matches[0].user_id, "far");

    let far_matches = service.list_matches("far").await.unwrap();
    assert_eq!(far_matches[0].user_id, "viewer");

    let stats = service.stats("viewer").await.unwrap();
    assert_eq!(stats.total_actions, 2);
    assert_eq!(stats.match_rate, 100.0);

    // Nobody has a first name, so notifications use the fallback
    let (inbox, unread) = service.notifications("viewer", true, 50).await.unwrap();
    assert_eq!(unread, 1);
    assert_eq!(inbox[0].message, "It's a match! Someone liked you back!");
}

#[tokio::test]
async fn test_integration_changed_mind() {
    let service = seeded_service().await;

    service.record_action("twin", "viewer", LikeAction::Like).await.unwrap();
    service.record_action("viewer", "twin", LikeAction::Pass).await.unwrap();

    // Liking after a pass replaces the pass and completes the match
    let outcome = service.record_action("viewer", "twin", LikeAction::Like).await.unwrap();
    assert!(outcome.is_match);
    assert_eq!(service.seen_profiles("viewer").await.unwrap(), vec!["twin"]);
}

#[tokio::test]
async fn test_integration_unknown_viewer() {
    let service = seeded_service().await;
    let err = service.potential_matches("ghost", 10, true).await.unwrap_err();
    assert!(matches!(err, ServiceError::Match(MatchError::ProfileNotFound(_))));
}
