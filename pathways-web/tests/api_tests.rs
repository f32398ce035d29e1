//! Integration tests for pathways-web API endpoints
//!
//! Tests cover:
//! - Public endpoints (health, build info, auth status)
//! - Session authentication (401) and admin capability (403)
//! - Pathway selection
//! - Canvas reads/writes routed by role
//! - Per-user progress endpoints
//! - Admin catalog editing

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use pathways_common::config::GoogleOAuthConfig;
use pathways_common::db::create_schema;
use pathways_common::models::NewUser;
use pathways_common::{AllowList, Card, Item, Pathway};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use pathways_web::{build_router, AppState};
use tower::util::ServiceExt; // for `oneshot` method

const ADMIN_EMAIL: &str = "admin@example.com";

/// Test helper: App over an in-memory database with one admin email allowed
async fn setup_state() -> AppState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");
    create_schema(&pool).await.expect("create schema");

    AppState::new(pool, Arc::new(AllowList::new([ADMIN_EMAIL])))
}

fn app(state: &AppState) -> Router {
    build_router(state.clone())
}

/// Test helper: Create a user and a live session, returning the Cookie header
async fn login(state: &AppState, email: &str) -> String {
    let user = state
        .users
        .create(&NewUser {
            provider_id: format!("google-{}", email),
            display_name: email.to_string(),
            first_name: "Test".to_string(),
            last_name: None,
            email: email.to_string(),
            image: None,
        })
        .await
        .unwrap();
    let token = state.sessions.create(user.id).await.unwrap();
    format!("pathways_session={}", token)
}

async fn add_pathway(state: &AppState, name: &str) -> Pathway {
    let pathway = state.catalog.create(name, "desc").await.unwrap();
    let cards = vec![Card::new(
        format!("{} basics", name),
        vec![Item::new("Shared task", false)],
    )];
    state.catalog.replace_cards(pathway.id, &cards).await.unwrap();
    state.catalog.find_by_id(pathway.id).await.unwrap().unwrap()
}

/// Test helper: Build a request with optional session cookie and JSON body
fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Value) {
    let response = app(state).oneshot(req).await.unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

// =============================================================================
// Public endpoints
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_no_auth_required() {
    let state = setup_state().await;

    let (status, body) = send(&state, request("GET", "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "pathways-web");
    assert_eq!(body["database"], "connected");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_buildinfo_endpoint() {
    let state = setup_state().await;

    let (status, body) = send(&state, request("GET", "/api/buildinfo", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["git_hash"].is_string());
    assert!(body["build_profile"].is_string());
}

#[tokio::test]
async fn test_auth_status_reports_session() {
    let state = setup_state().await;
    let cookie = login(&state, "learner@example.com").await;

    let (status, body) = send(&state, request("GET", "/auth/status", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isAuthenticated"], false);
    assert!(body.get("user").is_none());

    let (_, body) = send(&state, request("GET", "/auth/status", Some(&cookie), None)).await;
    assert_eq!(body["isAuthenticated"], true);
    assert_eq!(body["user"]["email"], "learner@example.com");
}

// =============================================================================
// Authentication and authorization
// =============================================================================

#[tokio::test]
async fn test_protected_routes_require_session() {
    let state = setup_state().await;
    let pathway = add_pathway(&state, "Illustrator").await;

    for (method, uri) in [
        ("GET", "/api/pathways".to_string()),
        ("GET", "/api/selected-pathways".to_string()),
        ("GET", "/api/profile".to_string()),
        ("GET", format!("/api/canvas/{}", pathway.id)),
        ("GET", format!("/api/user/progress/{}", pathway.id)),
        ("GET", "/api/pathways/all".to_string()),
    ] {
        let (status, body) = send(&state, request(method, &uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
    }
}

#[tokio::test]
async fn test_unknown_session_token_rejected() {
    let state = setup_state().await;

    let (status, _) = send(
        &state,
        request("GET", "/api/pathways", Some("pathways_session=forged"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_check_admin() {
    let state = setup_state().await;
    let admin = login(&state, ADMIN_EMAIL).await;
    let learner = login(&state, "learner@example.com").await;

    let (_, body) = send(&state, request("GET", "/api/check-admin", Some(&admin), None)).await;
    assert_eq!(body["isAdmin"], true);

    let (_, body) = send(&state, request("GET", "/api/check-admin", Some(&learner), None)).await;
    assert_eq!(body["isAdmin"], false);
}

#[tokio::test]
async fn test_admin_routes_forbidden_for_learners() {
    let state = setup_state().await;
    let pathway = add_pathway(&state, "Illustrator").await;
    let learner = login(&state, "learner@example.com").await;

    let cases = [
        ("GET", "/api/pathways/all".to_string(), None),
        ("PUT", "/api/pathways/all".to_string(), Some(json!([]))),
        ("POST", "/api/pathways".to_string(), Some(json!({"name": "New"}))),
        ("PUT", format!("/api/pathways/{}", pathway.id), Some(json!({"name": "X"}))),
        ("DELETE", format!("/api/pathways/{}", pathway.id), None),
        ("PUT", format!("/api/pathways/{}/state", pathway.id), Some(json!({"cards": []}))),
        ("GET", format!("/api/pathways/{}/text", pathway.id), None),
        ("GET", "/api/diagnostics".to_string(), None),
    ];

    for (method, uri, body) in cases {
        let (status, json) = send(&state, request(method, &uri, Some(&learner), body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
        assert_eq!(json["error"]["code"], "FORBIDDEN");
    }

    // Catalog untouched
    let stored = state.catalog.find_by_id(pathway.id).await.unwrap().unwrap();
    assert_eq!(stored, pathway);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let state = setup_state().await;
    let cookie = login(&state, "learner@example.com").await;

    let response = app(&state)
        .oneshot(request("GET", "/auth/logout", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("pathways_session=;"));
    assert!(set_cookie.contains("Max-Age=0"));

    let (status, _) = send(&state, request("GET", "/api/pathways", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_google_login_unconfigured_is_503() {
    let state = setup_state().await;

    let (status, body) = send(&state, request("GET", "/auth/google", None, None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_google_login_redirects_with_state_cookie() {
    let state = setup_state().await.with_google(GoogleOAuthConfig {
        client_id: "client-123".to_string(),
        client_secret: "secret".to_string(),
        callback_url: "http://localhost:3000/auth/google/callback".to_string(),
    });

    let response = app(&state)
        .oneshot(request("GET", "/auth/google", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("https://accounts.google.com/"));
    assert!(location.contains("client_id=client-123"));

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("pathways_oauth_state="));
    assert!(set_cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_google_callback_rejects_state_mismatch() {
    let state = setup_state().await.with_google(GoogleOAuthConfig {
        client_id: "client-123".to_string(),
        client_secret: "secret".to_string(),
        callback_url: "http://localhost:3000/auth/google/callback".to_string(),
    });

    let (status, body) = send(
        &state,
        request(
            "GET",
            "/auth/google/callback?code=abc&state=attacker",
            Some("pathways_oauth_state=expected"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// =============================================================================
// Selection
// =============================================================================

#[tokio::test]
async fn test_selection_flow() {
    let state = setup_state().await;
    let a = add_pathway(&state, "A").await;
    let b = add_pathway(&state, "B").await;
    let c = add_pathway(&state, "C").await;
    let cookie = login(&state, "learner@example.com").await;

    let (_, body) = send(&state, request("GET", "/api/selected-pathways", Some(&cookie), None)).await;
    assert_eq!(body["selectedPathways"], json!([]));

    let (status, body) = send(
        &state,
        request(
            "POST",
            "/api/selected-pathways",
            Some(&cookie),
            Some(json!({"pathwayIds": [a.id, b.id, c.id]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, body) = send(&state, request("GET", "/api/selected-pathways", Some(&cookie), None)).await;
    assert_eq!(body["selectedPathways"], json!([a.id, b.id, c.id]));
}

#[tokio::test]
async fn test_selection_validation_errors() {
    let state = setup_state().await;
    let a = add_pathway(&state, "A").await;
    let b = add_pathway(&state, "B").await;
    let cookie = login(&state, "learner@example.com").await;

    for ids in [
        json!([a.id, b.id]),
        json!([a.id, b.id, a.id]),
        json!([a.id, b.id, "not-a-uuid"]),
        json!([a.id, b.id, uuid::Uuid::new_v4()]),
    ] {
        let (status, body) = send(
            &state,
            request(
                "POST",
                "/api/selected-pathways",
                Some(&cookie),
                Some(json!({ "pathwayIds": ids })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_malformed_bodies_use_error_shape() {
    let state = setup_state().await;
    let cookie = login(&state, "learner@example.com").await;
    let admin = login(&state, ADMIN_EMAIL).await;
    let a = add_pathway(&state, "A").await;

    let broken_json = Request::builder()
        .method("POST")
        .uri("/api/selected-pathways")
        .header(header::COOKIE, &cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"pathwayIds\": ["))
        .unwrap();
    let no_content_type = Request::builder()
        .method("PUT")
        .uri(format!("/api/user/progress/{}", a.id))
        .header(header::COOKIE, &cookie)
        .body(Body::from("{\"cards\": []}"))
        .unwrap();
    let wrong_shape = request(
        "PUT",
        &format!("/api/pathways/{}", a.id),
        Some(&admin),
        Some(json!({"name": 42})),
    );

    for req in [broken_json, no_content_type, wrong_shape] {
        let (status, body) = send(&state, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert!(body["error"]["message"].is_string());
    }
}

#[tokio::test]
async fn test_profile_skips_deleted_pathways() {
    let state = setup_state().await;
    let a = add_pathway(&state, "A").await;
    let b = add_pathway(&state, "B").await;
    let c = add_pathway(&state, "C").await;
    let cookie = login(&state, "learner@example.com").await;

    send(
        &state,
        request(
            "POST",
            "/api/selected-pathways",
            Some(&cookie),
            Some(json!({"pathwayIds": [a.id, b.id, c.id]})),
        ),
    )
    .await;
    state.catalog.delete(b.id).await.unwrap();

    let (status, body) = send(&state, request("GET", "/api/profile", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "learner@example.com");
    assert_eq!(body["isAdmin"], false);

    let names: Vec<&str> = body["selectedPathways"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A", "C"]);
}

// =============================================================================
// Canvas and progress
// =============================================================================

#[tokio::test]
async fn test_learner_canvas_save_is_private() {
    let state = setup_state().await;
    let p = add_pathway(&state, "Muralist").await;
    let alice = login(&state, "alice@example.com").await;
    let bob = login(&state, "bob@example.com").await;
    let uri = format!("/api/canvas/{}", p.id);

    let (status, body) = send(&state, request("GET", &uri, Some(&alice), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "catalog");
    assert_eq!(body["cards"][0]["title"], "Muralist basics");

    let mine = json!({"cards": [{"title": "Mine", "items": [{"text": "Sketch", "completed": true}]}]});
    let (status, body) = send(&state, request("PUT", &uri, Some(&alice), Some(mine))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["savedTo"], "progress");

    let (_, body) = send(&state, request("GET", &uri, Some(&alice), None)).await;
    assert_eq!(body["source"], "progress");
    assert_eq!(body["cards"][0]["title"], "Mine");
    assert_eq!(body["cards"][0]["items"][0]["completed"], true);

    let (_, body) = send(&state, request("GET", &uri, Some(&bob), None)).await;
    assert_eq!(body["source"], "catalog");
}

#[tokio::test]
async fn test_admin_canvas_save_updates_catalog() {
    let state = setup_state().await;
    let p = add_pathway(&state, "Muralist").await;
    let admin = login(&state, ADMIN_EMAIL).await;
    let learner = login(&state, "learner@example.com").await;
    let uri = format!("/api/canvas/{}", p.id);

    let curated = json!({"cards": [{"title": "Curated", "items": []}]});
    let (status, body) = send(&state, request("PUT", &uri, Some(&admin), Some(curated))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["savedTo"], "catalog");

    let (_, body) = send(&state, request("GET", &uri, Some(&learner), None)).await;
    assert_eq!(body["source"], "catalog");
    assert_eq!(body["cards"][0]["title"], "Curated");
}

#[tokio::test]
async fn test_canvas_rejects_bad_input() {
    let state = setup_state().await;
    let p = add_pathway(&state, "Muralist").await;
    let cookie = login(&state, "learner@example.com").await;

    let (status, _) = send(
        &state,
        request(
            "PUT",
            &format!("/api/canvas/{}", p.id),
            Some(&cookie),
            Some(json!({"cards": "nope"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&state, request("GET", "/api/canvas/not-a-uuid", Some(&cookie), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &state,
        request(
            "PUT",
            &format!("/api/canvas/{}", uuid::Uuid::new_v4()),
            Some(&cookie),
            Some(json!({"cards": []})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_deleted_pathway_canvas_is_empty() {
    let state = setup_state().await;
    let cookie = login(&state, "learner@example.com").await;

    let (status, body) = send(
        &state,
        request("GET", &format!("/api/canvas/{}", uuid::Uuid::new_v4()), Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "none");
    assert_eq!(body["cards"], json!([]));
}

#[tokio::test]
async fn test_user_progress_endpoints() {
    let state = setup_state().await;
    let p = add_pathway(&state, "Muralist").await;
    let admin = login(&state, ADMIN_EMAIL).await;
    let uri = format!("/api/user/progress/{}", p.id);

    let (status, body) = send(&state, request("GET", &uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"], Value::Null);

    // Even an admin writes a private copy through this endpoint
    let cards = json!({"cards": [{"title": "Own", "items": [{"text": "t", "completed": false}]}]});
    let (status, _) = send(&state, request("PUT", &uri, Some(&admin), Some(cards))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&state, request("GET", &uri, Some(&admin), None)).await;
    assert_eq!(body["progress"]["pathwayId"], json!(p.id));
    assert_eq!(body["progress"]["cards"][0]["title"], "Own");

    let stored = state.catalog.find_by_id(p.id).await.unwrap().unwrap();
    assert_eq!(stored.cards, p.cards);
}

#[tokio::test]
async fn test_pathway_state_reads_catalog() {
    let state = setup_state().await;
    let p = add_pathway(&state, "Muralist").await;
    let cookie = login(&state, "learner@example.com").await;

    let (status, body) = send(
        &state,
        request("GET", &format!("/api/pathways/{}/state", p.id), Some(&cookie), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::to_value(&p.cards).unwrap());
}

// =============================================================================
// Admin catalog
// =============================================================================

#[tokio::test]
async fn test_admin_create_update_delete() {
    let state = setup_state().await;
    let admin = login(&state, ADMIN_EMAIL).await;

    let (status, body) = send(
        &state,
        request(
            "POST",
            "/api/pathways",
            Some(&admin),
            Some(json!({"name": " Model Maker ", "description": "Builds models"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pathway"]["name"], "Model Maker");
    let id = body["pathway"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &state,
        request(
            "PUT",
            &format!("/api/pathways/{}", id),
            Some(&admin),
            Some(json!({"description": "Builds scale models"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pathway"]["name"], "Model Maker");
    assert_eq!(body["pathway"]["description"], "Builds scale models");

    let (status, _) = send(
        &state,
        request(
            "POST",
            "/api/pathways",
            Some(&admin),
            Some(json!({"name": "Model Maker"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&state, request("DELETE", &format!("/api/pathways/{}", id), Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&state, request("DELETE", &format!("/api/pathways/{}", id), Some(&admin), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_text_editor_round_trip() {
    let state = setup_state().await;
    let p = add_pathway(&state, "Muralist").await;
    let admin = login(&state, ADMIN_EMAIL).await;
    let uri = format!("/api/pathways/{}/text", p.id);

    let (status, body) = send(&state, request("GET", &uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Muralist basics\n- [ ] Shared task");

    let (status, body) = send(
        &state,
        request(
            "PUT",
            &uri,
            Some(&admin),
            Some(json!({
                "name": "Muralist",
                "description": "Paints walls",
                "text": "Prep\n- [x] Buy paint\n- [ ] Prime wall\n\nPaint\n- [ ] First coat"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pathway"]["description"], "Paints walls");

    let stored = state.catalog.find_by_id(p.id).await.unwrap().unwrap();
    assert_eq!(
        stored.cards,
        vec![
            Card::new(
                "Prep",
                vec![Item::new("Buy paint", true), Item::new("Prime wall", false)]
            ),
            Card::new("Paint", vec![Item::new("First coat", false)]),
        ]
    );
}

#[tokio::test]
async fn test_admin_put_state_replaces_catalog_cards() {
    let state = setup_state().await;
    let p = add_pathway(&state, "Muralist").await;
    let admin = login(&state, ADMIN_EMAIL).await;

    let (status, body) = send(
        &state,
        request(
            "PUT",
            &format!("/api/pathways/{}/state", p.id),
            Some(&admin),
            Some(json!({"cards": [{"title": "", "items": [{"text": ""}]}]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cards"][0]["title"], "Card Title");
    assert_eq!(body["cards"][0]["items"][0]["text"], "New Task...");
}

#[tokio::test]
async fn test_admin_bulk_update_reports_failures() {
    let state = setup_state().await;
    let a = add_pathway(&state, "A").await;
    let admin = login(&state, ADMIN_EMAIL).await;
    let missing = uuid::Uuid::new_v4();

    let (status, body) = send(
        &state,
        request(
            "PUT",
            "/api/pathways/all",
            Some(&admin),
            Some(json!([
                {"id": a.id, "name": "A prime"},
                {"id": missing, "name": "Ghost"}
            ])),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modifiedCount"], 1);
    assert_eq!(body["errors"][0]["index"], 1);
    assert_eq!(body["errors"][0]["id"], json!(missing));

    let (_, body) = send(&state, request("GET", "/api/pathways/all", Some(&admin), None)).await;
    assert_eq!(body[0]["name"], "A prime");
}

#[tokio::test]
async fn test_admin_diagnostics() {
    let state = setup_state().await;
    add_pathway(&state, "Illustrator").await;
    let admin = login(&state, ADMIN_EMAIL).await;

    let (status, body) = send(&state, request("GET", "/api/diagnostics", Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pathwaysInDb"], 1);
    assert_eq!(body["defaultPathways"], 70);
    assert_eq!(body["missing"].as_array().unwrap().len(), 69);
}
