// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard route: score summary, recent activity and achievements.

use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{CarbonActivity, UserScore};
use crate::AppState;

/// Unlock thresholds for the achievement cards.
const CARBON_SAVER_KG: f64 = 100.0;
const ECO_WARRIOR_STREAK: u32 = 7;
const SCANNER_PRO_SCANS: u64 = 10;

/// How many recent activities the dashboard shows.
const RECENT_ACTIVITY_COUNT: u32 = 3;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard", get(get_dashboard))
}

#[derive(Serialize)]
pub struct Achievement {
    pub title: String,
    pub description: String,
    pub unlocked: bool,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    /// Current eco score (0-100)
    pub eco_score: f64,
    /// Lifetime logged emissions total (kg CO₂)
    pub co2_saved_kg: f64,
    pub points_earned: i64,
    pub streak_days: u32,
    /// Mon-Sun series for the weekly chart
    pub weekly_data: Vec<f64>,
    pub recent_activities: Vec<CarbonActivity>,
    pub achievements: Vec<Achievement>,
    /// Eco score / weekly activity / streak goal meters (percent)
    pub goal_progress: [u32; 3],
}

/// Get the signed-in user's dashboard.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>> {
    let token = &user.access_token;

    // First visit has no score row yet; render the starting values.
    let score = state
        .db
        .get_user_score(token, user.user_id)
        .await?
        .unwrap_or_else(|| UserScore::new(user.user_id, Utc::now()));

    let recent_activities = state
        .db
        .get_activities(token, user.user_id, Some(RECENT_ACTIVITY_COUNT))
        .await?;

    // Total straight from the activity rows rather than the score
    // aggregate, so the headline number survives score-row resets.
    let total_co2_kg = state.db.sum_activity_co2(token, user.user_id).await?;

    let scan_count = state.db.count_scans(token, user.user_id).await?;

    let goal_progress = score.goal_progress(recent_activities.len());

    Ok(Json(DashboardResponse {
        eco_score: score.eco_score,
        co2_saved_kg: total_co2_kg,
        points_earned: score.points_earned,
        streak_days: score.streak_days,
        weekly_data: score.weekly_data.clone(),
        recent_activities,
        achievements: build_achievements(total_co2_kg, score.streak_days, scan_count),
        goal_progress,
    }))
}

fn build_achievements(total_co2_kg: f64, streak_days: u32, scan_count: u64) -> Vec<Achievement> {
    vec![
        Achievement {
            title: "Carbon Saver".to_string(),
            description: format!("Saved {:.1}kg CO₂", total_co2_kg),
            unlocked: total_co2_kg >= CARBON_SAVER_KG,
        },
        Achievement {
            title: "Eco Warrior".to_string(),
            description: format!("{}-day streak", streak_days),
            unlocked: streak_days >= ECO_WARRIOR_STREAK,
        },
        Achievement {
            title: "Scanner Pro".to_string(),
            description: "Scanned 10+ products".to_string(),
            unlocked: scan_count >= SCANNER_PRO_SCANS,
        },
        // No recycling drop-off data is collected yet, so this card
        // stays locked.
        Achievement {
            title: "Recycling Champ".to_string(),
            description: "Recycled 20+ items".to_string(),
            unlocked: false,
        },
    ]
}
