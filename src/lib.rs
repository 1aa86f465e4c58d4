// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GreenGARV: sustainability companion backend
//!
//! This crate provides the JSON API behind the GreenGARV web app:
//! carbon activity tracking, product scanning, recycling center search
//! and a reuse marketplace.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::SupabaseDb;
use services::{AuthClient, CarbonClient, OcrClient, OverpassClient, ProductClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: SupabaseDb,
    pub auth: AuthClient,
    pub carbon: CarbonClient,
    pub products: ProductClient,
    pub ocr: OcrClient,
    pub overpass: OverpassClient,
}
