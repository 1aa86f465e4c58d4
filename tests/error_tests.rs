// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error taxonomy tests.
//!
//! Checks the HTTP status and JSON body each error variant produces,
//! and that server-side failures never leak internal detail strings.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::IntoResponse,
};
use greengarv::error::AppError;
use tower::ServiceExt;
use uuid::Uuid;

mod common;

async fn error_body(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_not_found_shape() {
    let (status, body) = error_body(AppError::NotFound("Product 000 not found".into())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["details"], "Product 000 not found");
}

#[tokio::test]
async fn test_invalid_credentials_shape() {
    let (status, body) = error_body(AppError::InvalidCredentials).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_upstream_shape() {
    let (status, body) = error_body(AppError::Upstream("product lookup failed".into())).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "upstream_error");
}

#[tokio::test]
async fn test_database_error_hides_details() {
    let (status, body) =
        error_body(AppError::Database("connection to db-host-7 refused".into())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "database_error");
    assert!(
        body.get("details").is_none(),
        "internal message must not reach the client"
    );
}

#[tokio::test]
async fn test_internal_error_hides_details() {
    let (status, body) =
        error_body(AppError::Internal(anyhow::anyhow!("secret key misread"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_store_failure_over_http_does_not_leak() {
    let (app, state) = common::create_test_app();
    let token = common::session_token(Uuid::new_v4(), &state.config.supabase_jwt_secret);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/dashboard")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "database_error");
    assert!(body.get("details").is_none());
}
