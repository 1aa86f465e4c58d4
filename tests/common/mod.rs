// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use greengarv::config::Config;
use greengarv::db::SupabaseDb;
use greengarv::routes::create_router;
use greengarv::services::{AuthClient, CarbonClient, OcrClient, OverpassClient, ProductClient};
use greengarv::AppState;
use std::sync::Arc;

/// Create a test app with an offline store and unreachable providers.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::default())
}

/// Create a test app from a specific config. The store stays offline so
/// no test ever reaches a real backend.
#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let db = SupabaseDb::new_mock();
    let auth = AuthClient::new(&config.supabase_url, &config.supabase_anon_key);
    let carbon = CarbonClient::new(config.carbon_api_url.clone(), config.carbon_api_key.clone());
    let products = ProductClient::new(config.off_url.clone());
    let ocr = OcrClient::new(config.ocr_api_url.clone(), config.ocr_api_key.clone());
    let overpass = OverpassClient::new(config.overpass_url.clone());

    let state = Arc::new(AppState {
        config,
        db,
        auth,
        carbon,
        products,
        ocr,
        overpass,
    });

    (create_router(state.clone()), state)
}

/// Mint a session token the auth middleware accepts.
#[allow(dead_code)]
pub fn session_token(user_id: uuid::Uuid, secret: &[u8]) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = serde_json::json!({
        "sub": user_id.to_string(),
        "exp": now + 3600,
        "email": "user@example.com",
        "user_metadata": { "name": "Test User" },
    });

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}
