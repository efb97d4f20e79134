//! HTTP surface tests against the full router (in-memory backend).
//!
//! Exercises status codes and wire shapes: 400 vs 401 on a missing token,
//! 201 on listing creation, the 404 conflation for review mutations, and
//! the camelCase JSON bodies.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use gourmet_server::api::build_app;
use gourmet_server::core::{AppState, Config, StorageKind};
use gourmet_server::db::MemStorage;

const TOKEN_HEADER: &str = "x-user-cookie";

fn test_app() -> Router {
    let config = Config {
        http_port: 0,
        environment: "test".to_string(),
        storage: StorageKind::Memory,
        database_path: String::new(),
    };
    let state = AppState::with_storage(config, Arc::new(MemStorage::new()));
    build_app().with_state(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        builder = builder.header(TOKEN_HEADER, t);
    }
    builder.body(Body::empty()).expect("request")
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(TOKEN_HEADER, t);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn restaurant_payload(name: &str) -> Value {
    json!({
        "name": name,
        "genre": "Ramen",
        "address": format!("{name} street 1-2-3"),
    })
}

async fn create_restaurant(app: &Router, name: &str) -> i64 {
    let (status, body) = send(
        app,
        json_request("POST", "/api/restaurants", Some("creator"), restaurant_payload(name)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("id")
}

#[tokio::test]
async fn health_reports_backend() {
    let app = test_app();
    let (status, body) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn restaurant_create_requires_token_401() {
    let app = test_app();
    let (status, body) = send(
        &app,
        json_request("POST", "/api/restaurants", None, restaurant_payload("NoToken")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn review_create_requires_token_400() {
    let app = test_app();
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/reviews",
            None,
            json!({"restaurantId": 1, "nickname": "A", "rating": 5}),
        ),
    )
    .await;
    // Review/bookmark identity gate answers 400, listing gate answers 401
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bookmark_routes_require_token_400() {
    let app = test_app();
    for request in [
        get("/api/bookmarks", None),
        json_request("POST", "/api/bookmarks", None, json!({"restaurantId": 1})),
        get("/api/bookmarks/1/check", None),
    ] {
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn restaurant_listing_and_detail() {
    let app = test_app();
    let id = create_restaurant(&app, "MESO").await;

    let (status, body) = send(&app, get("/api/restaurants", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 1);
    assert_eq!(body[0]["name"], "MESO");
    assert_eq!(body[0]["averageRating"], 0.0);
    assert_eq!(body[0]["reviewCount"], 0);

    let (status, body) = send(&app, get(&format!("/api/restaurants/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reviews"], json!([]));
    assert_eq!(body["menuItems"], json!([]));

    let (status, _) = send(&app, get("/api/restaurants/9999", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_flow_updates_stats() {
    let app = test_app();
    let id = create_restaurant(&app, "MESO").await;

    for (token, rating) in [("user-a", 5), ("user-b", 4)] {
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/reviews",
                Some(token),
                json!({"restaurantId": id, "nickname": token, "rating": rating}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rating"], rating);
    }

    let (_, body) = send(&app, get(&format!("/api/restaurants/{id}"), None)).await;
    assert_eq!(body["averageRating"], 4.5);
    assert_eq!(body["reviewCount"], 2);
    assert_eq!(body["reviews"].as_array().expect("reviews").len(), 2);
}

#[tokio::test]
async fn review_invalid_rating_is_400() {
    let app = test_app();
    let id = create_restaurant(&app, "Strict").await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/reviews",
            Some("user-a"),
            json!({"restaurantId": id, "nickname": "A", "rating": 6}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error").contains("Rating"));
}

#[tokio::test]
async fn duplicate_review_is_400() {
    let app = test_app();
    let id = create_restaurant(&app, "Once").await;
    let payload = json!({"restaurantId": id, "nickname": "A", "rating": 5});
    let (status, _) = send(
        &app,
        json_request("POST", "/api/reviews", Some("user-a"), payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        json_request("POST", "/api/reviews", Some("user-a"), payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn review_mutation_conflates_missing_and_foreign() {
    let app = test_app();
    let id = create_restaurant(&app, "Guarded").await;
    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/api/reviews",
            Some("owner"),
            json!({"restaurantId": id, "nickname": "O", "rating": 3}),
        ),
    )
    .await;
    let review_id = body["id"].as_i64().expect("review id");

    // Foreign token and absent id produce the same 404
    let patch = json!({"rating": 5});
    let (status, _) = send(
        &app,
        json_request("PUT", &format!("/api/reviews/{review_id}"), Some("intruder"), patch.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        json_request("PUT", "/api/reviews/9999", Some("owner"), patch.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The owner succeeds
    let (status, body) = send(
        &app,
        json_request("PUT", &format!("/api/reviews/{review_id}"), Some("owner"), patch),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 5);

    // Delete: foreign 404, owner {"success": true}
    let (status, _) = send(
        &app,
        json_request("DELETE", &format!("/api/reviews/{review_id}"), Some("intruder"), Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(
        &app,
        json_request("DELETE", &format!("/api/reviews/{review_id}"), Some("owner"), Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn my_reviews_listing() {
    let app = test_app();
    let id = create_restaurant(&app, "Mine").await;
    send(
        &app,
        json_request(
            "POST",
            "/api/reviews",
            Some("me"),
            json!({"restaurantId": id, "nickname": "Me", "rating": 4}),
        ),
    )
    .await;

    let (status, body) = send(&app, get("/api/reviews/user", Some("me"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 1);

    let (_, body) = send(&app, get("/api/reviews/user", Some("someone-else"))).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn bookmark_toggle_flow() {
    let app = test_app();
    let id = create_restaurant(&app, "Marked").await;

    let (status, body) = send(&app, get(&format!("/api/bookmarks/{id}/check"), Some("t"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isBookmarked"], false);

    let (status, body) = send(
        &app,
        json_request("POST", "/api/bookmarks", Some("t"), json!({"restaurantId": id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["restaurantId"], id);

    let (_, body) = send(&app, get(&format!("/api/bookmarks/{id}/check"), Some("t"))).await;
    assert_eq!(body["isBookmarked"], true);

    let (status, body) = send(&app, get("/api/bookmarks", Some("t"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["isBookmarked"], true);
    assert_eq!(body[0]["name"], "Marked");

    // Delete always answers 200 with a success flag
    let (status, body) = send(
        &app,
        json_request("DELETE", &format!("/api/bookmarks/{id}"), Some("t"), Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let (status, body) = send(
        &app,
        json_request("DELETE", &format!("/api/bookmarks/{id}"), Some("t"), Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn compound_create_with_menu_items() {
    let app = test_app();
    let mut payload = restaurant_payload("Combo");
    payload["menuItems"] = json!([
        {"name": "Gyoza", "price": 400, "isPopular": true},
        {"name": "Rice", "price": 150}
    ]);
    let (status, body) = send(
        &app,
        json_request("POST", "/api/restaurants", Some("creator"), payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().expect("id");

    let (status, body) = send(&app, get(&format!("/api/restaurants/{id}/menu-items"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("items").len(), 2);

    let (status, body) = send(&app, get("/api/menu-items/popular", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("popular").len(), 1);
    assert_eq!(body[0]["name"], "Gyoza");
    assert_eq!(body[0]["restaurantName"], "Combo");
}

#[tokio::test]
async fn compound_create_with_duplicate_items_is_400_and_atomic() {
    let app = test_app();
    let mut payload = restaurant_payload("Atomic");
    payload["menuItems"] = json!([
        {"name": "Gyoza", "price": 400},
        {"name": "Gyoza", "price": 450}
    ]);
    let (status, _) = send(
        &app,
        json_request("POST", "/api/restaurants", Some("creator"), payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, get("/api/restaurants", None)).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn duplicate_restaurant_is_400() {
    let app = test_app();
    create_restaurant(&app, "Dup").await;
    let (status, body) = send(
        &app,
        json_request("POST", "/api/restaurants", Some("creator"), restaurant_payload("Dup")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error").contains("already exists"));
}

#[tokio::test]
async fn restaurant_validation_rejects_blank_name() {
    let app = test_app();
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/restaurants",
            Some("creator"),
            json!({"name": "  ", "genre": "Ramen", "address": "somewhere"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn menu_item_create_route() {
    let app = test_app();
    let id = create_restaurant(&app, "Kitchen").await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/restaurants/{id}/menu-items"),
            None,
            json!({"name": "Gyoza", "price": 400}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/restaurants/{id}/menu-items"),
            Some("creator"),
            json!({"name": "Gyoza", "price": 400}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["restaurantId"], id);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/restaurants/{id}/menu-items"),
            Some("creator"),
            json!({"name": "Gyoza", "price": 500}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn genre_and_search_query_filters() {
    let app = test_app();
    create_restaurant(&app, "Tonkotsu King").await;
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/restaurants",
            Some("creator"),
            json!({"name": "Cafe Luna", "genre": "Cafe", "address": "moon street"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, get("/api/restaurants?genre=Cafe", None)).await;
    assert_eq!(body.as_array().expect("array").len(), 1);
    assert_eq!(body[0]["name"], "Cafe Luna");

    let (_, body) = send(&app, get("/api/restaurants?genre=all", None)).await;
    assert_eq!(body.as_array().expect("array").len(), 2);

    let (_, body) = send(&app, get("/api/restaurants?search=tonkotsu", None)).await;
    assert_eq!(body.as_array().expect("array").len(), 1);
    assert_eq!(body[0]["name"], "Tonkotsu King");
}
