// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GreenGARV API Server
//!
//! Serves the GreenGARV web app: carbon footprint tracking, product
//! scanning, recycling guidance and the reuse marketplace.

use greengarv::{
    config::Config,
    db::SupabaseDb,
    services::{AuthClient, CarbonClient, OcrClient, OverpassClient, ProductClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting GreenGARV API");

    // Hosted backend: auth endpoints plus the row store
    let db = SupabaseDb::new(&config.supabase_url, &config.supabase_anon_key)
        .expect("Failed to build store client");
    let auth = AuthClient::new(&config.supabase_url, &config.supabase_anon_key);

    // External providers
    let carbon = CarbonClient::new(config.carbon_api_url.clone(), config.carbon_api_key.clone());
    let products = ProductClient::new(config.off_url.clone());
    let ocr = OcrClient::new(config.ocr_api_url.clone(), config.ocr_api_key.clone());
    let overpass = OverpassClient::new(config.overpass_url.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        auth,
        carbon,
        products,
        ocr,
        overpass,
    });

    // Build router
    let app = greengarv::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("greengarv=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
