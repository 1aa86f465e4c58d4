// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Scanner and recycling-center tests with upstream services offline.
//!
//! Barcode lookup needs the product database and surfaces a 502 when it
//! is unreachable; label OCR and center search degrade to their
//! documented fallbacks instead of failing the request.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;
use uuid::Uuid;

mod common;

const BOUNDARY: &str = "X-GARV-TEST-BOUNDARY";

/// Hand-rolled multipart body with a single field.
fn multipart_body(field_name: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field_name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn post_multipart(uri: &str, body: Vec<u8>) -> axum::response::Response {
    let (app, state) = common::create_test_app();
    let token = common::session_token(Uuid::new_v4(), &state.config.supabase_jwt_secret);

    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_barcode_lookup_upstream_down() {
    let (app, state) = common::create_test_app();
    let token = common::session_token(Uuid::new_v4(), &state.config.supabase_jwt_secret);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/scan")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"barcode":"5449000000996"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    // A 502 rather than a store error: the lookup runs before any
    // history write, so a failed lookup leaves no row behind.
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "upstream_error");
}

#[tokio::test]
async fn test_label_scan_falls_back_when_ocr_down() {
    let body = multipart_body("image", "label.jpg", b"\xff\xd8\xff\xe0 not a real jpeg");
    let response = post_multipart("/scan/label", body).await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["text"], "Could not parse image text");
    assert_eq!(body["parsed"], false);
}

#[tokio::test]
async fn test_label_scan_rejects_missing_image_field() {
    let body = multipart_body("document", "label.jpg", b"pixels");
    let response = post_multipart("/scan/label", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["details"], "Missing 'image' field in multipart payload");
}

#[tokio::test]
async fn test_label_scan_rejects_empty_image() {
    let body = multipart_body("image", "label.jpg", b"");
    let response = post_multipart("/scan/label", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"], "Image upload is empty");
}

#[tokio::test]
async fn test_center_search_degrades_to_empty_list() {
    let (app, state) = common::create_test_app();
    let token = common::session_token(Uuid::new_v4(), &state.config.supabase_jwt_secret);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/recycle/centers?lat=37.7749&lon=-122.4194&radius_km=50")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["centers"], serde_json::json!([]));
    assert_eq!(body["radius_km"], 50);
    assert_eq!(body["next_radius_km"], 100);
}

#[tokio::test]
async fn test_center_search_top_of_ladder_has_no_next() {
    let (app, state) = common::create_test_app();
    let token = common::session_token(Uuid::new_v4(), &state.config.supabase_jwt_secret);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/recycle/centers?lat=37.7749&lon=-122.4194&radius_km=600")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["next_radius_km"], serde_json::Value::Null);
}
