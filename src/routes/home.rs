// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public landing route.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::models::GlobalStats;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_home))
}

#[derive(Serialize)]
pub struct HomeResponse {
    pub stats: GlobalStats,
}

/// Landing page data: community-wide impact counters.
///
/// The counters are display-only, so a missing row or an unreachable
/// store falls back to the baked-in figures instead of failing the page.
async fn get_home(State(state): State<Arc<AppState>>) -> Json<HomeResponse> {
    let stats = match state.db.get_global_stats().await {
        Ok(Some(stats)) => stats,
        Ok(None) => GlobalStats::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Global stats fetch failed, using fallback figures");
            GlobalStats::default()
        }
    };

    Json(HomeResponse { stats })
}
