// HTTP API tests against the in-memory backend

use actix_web::{test, web, App};
use billiards_matchmaker::core::Matcher;
use billiards_matchmaker::routes::{self, AppState};
use billiards_matchmaker::services::MatchmakingService;
use serde_json::{json, Value};

macro_rules! init_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(MatchmakingService::in_memory(
                    Matcher::with_default_weights(),
                ))))
                .app_data(routes::json_config())
                .app_data(routes::query_config())
                .configure(routes::configure_routes),
        )
        .await
    };
}

fn profile_body(skill: f64, location: &str, first_name: &str) -> Value {
    json!({
        "skillLevel": skill,
        "preferredLocation": location,
        "preferredGameTypes": ["8-Ball"],
        "availability": { "Monday": ["Evening"], "Tuesday": null },
        "firstName": first_name,
        "favouriteCue": "ignored"
    })
}

#[actix_web::test]
async fn test_profile_create_then_update() {
    let app = init_app!();

    let req = test::TestRequest::put()
        .uri("/api/v1/profiles/alice")
        .set_json(profile_body(3.0, "Brisbane", "Alice"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::put()
        .uri("/api/v1/profiles/alice")
        .set_json(profile_body(4.0, "Brisbane", "Alice"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get().uri("/api/v1/profiles/alice").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["userId"], "alice");
    assert_eq!(body["data"]["skillLevel"], 4.0);
    assert!(body["data"].get("favouriteCue").is_none());
}

#[actix_web::test]
async fn test_missing_profile_is_404() {
    let app = init_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/matchmaking/nobody/potential-matches")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Profile not found");
    assert_eq!(body["statusCode"], 404);
}

#[actix_web::test]
async fn test_match_flow_over_http() {
    let app = init_app!();

    for (id, name) in [("alice", "Alice"), ("bob", "Bob"), ("cara", "Cara")] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/profiles/{}", id))
            .set_json(profile_body(3.0, "Brisbane", name))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/matchmaking/alice/potential-matches?limit=5")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["totalFound"], 2);
    assert_eq!(body["matches"][0]["userId"], "bob");
    assert_eq!(body["matches"][0]["matchScore"], 100);

    for (user, target) in [("alice", "bob"), ("bob", "alice")] {
        let req = test::TestRequest::post()
            .uri("/api/v1/matchmaking/action")
            .set_json(json!({ "userId": user, "targetUserId": target, "action": "like" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["isMatch"], user == "bob");
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/matchmaking/alice/potential-matches")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["viewedCount"], 1);
    assert_eq!(body["matches"][0]["userId"], "cara");

    let req = test::TestRequest::get()
        .uri("/api/v1/matchmaking/alice/potential-matches?excludeViewed=false")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalFound"], 2);

    let req = test::TestRequest::get().uri("/api/v1/matchmaking/alice/matches").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalMatches"], 1);

    let req = test::TestRequest::get().uri("/api/v1/matchmaking/alice/seen").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["seenProfiles"], json!(["bob"]));

    let req = test::TestRequest::get().uri("/api/v1/notifications/alice").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["unreadCount"], 1);
    assert_eq!(body["notifications"][0]["message"], "It's a match! Bob liked you back!");
    let id = body["notifications"][0]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/notifications/{}/read", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["notification"]["isRead"], true);

    let req = test::TestRequest::get()
        .uri("/api/v1/notifications/alice/unread-count")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);
}

#[actix_web::test]
async fn test_notification_endpoints() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/notifications")
        .set_json(json!({
            "userId": "alice",
            "type": "system",
            "relatedUserId": "admin",
            "message": "Welcome to Billiards Hub"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    let id = body["notification"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri("/api/v1/notifications/alice/mark-all-read")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["modifiedCount"], 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/notifications/{}", id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/notifications/{}", id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_malformed_json_is_400() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/matchmaking/action")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
}
