// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request validation tests.
//!
//! Every rejection here happens before any store or upstream call, so
//! the offline test configuration never gets in the way: a 400 proves
//! the input was refused at the door.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;
use uuid::Uuid;

mod common;

/// POST a JSON body to a protected route with a valid session.
async fn post_json(uri: &str, body: serde_json::Value) -> axum::response::Response {
    let (app, state) = common::create_test_app();
    let token = common::session_token(Uuid::new_v4(), &state.config.supabase_jwt_secret);

    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// GET a protected route with a valid session.
async fn get_authed(uri: &str) -> axum::response::Response {
    let (app, state) = common::create_test_app();
    let token = common::session_token(Uuid::new_v4(), &state.config.supabase_jwt_secret);

    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

fn valid_listing() -> serde_json::Value {
    serde_json::json!({
        "title": "Oak bookshelf",
        "description": "Solid oak, five shelves",
        "price": 40.0,
        "category": "Furniture",
        "condition": "Good",
        "contact_number": "555-0100",
        "location": "Palo Alto",
        "tags": "oak, furniture"
    })
}

#[tokio::test]
async fn test_activity_rejects_zero_distance() {
    let response = post_json(
        "/tracker/activities",
        serde_json::json!({"activity_type": "vehicle", "distance_value": 0.0}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"], "distance_value must be a positive number");
}

#[tokio::test]
async fn test_activity_rejects_negative_distance() {
    let response = post_json(
        "/tracker/activities",
        serde_json::json!({"activity_type": "flight", "distance_value": -12.5}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_activity_rejects_unknown_type() {
    // Unknown enum variant fails JSON deserialization before the handler
    let response = post_json(
        "/tracker/activities",
        serde_json::json!({"activity_type": "rocket", "distance_value": 10.0}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_scan_rejects_blank_barcode() {
    let response = post_json("/scan", serde_json::json!({"barcode": "   "})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"], "barcode must not be empty");
}

#[tokio::test]
async fn test_listing_rejects_empty_title() {
    let mut listing = valid_listing();
    listing["title"] = serde_json::json!("");

    let response = post_json("/reuse", listing).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_listing_rejects_whitespace_title() {
    // Passes the length check but trims to nothing
    let mut listing = valid_listing();
    listing["title"] = serde_json::json!("   ");

    let response = post_json("/reuse", listing).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["details"], "title must not be empty");
}

#[tokio::test]
async fn test_listing_rejects_unknown_category() {
    let mut listing = valid_listing();
    listing["category"] = serde_json::json!("Vehicles");

    let response = post_json("/reuse", listing).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_listing_filter_rejects_unknown_category() {
    let response = get_authed("/reuse?category=Vehicles").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "bad_request");
    assert_eq!(body["details"], "Unknown category filter 'Vehicles'");
}

#[tokio::test]
async fn test_centers_reject_off_ladder_radius() {
    let response = get_authed("/recycle/centers?lat=37.0&lon=-122.0&radius_km=75").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_centers_reject_out_of_range_coordinates() {
    let response = get_authed("/recycle/centers?lat=100.0&lon=-122.0&radius_km=50").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["details"], "lat/lon out of range");
}

#[tokio::test]
async fn test_signin_rejects_malformed_email() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signin")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"email":"not-an-email","password":"hunter2"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"name":"Pat","email":"pat@example.com","password":"short"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}
