// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Carbon tracker routes: activity log, weekly summary, vehicle catalog.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    ActivityMetadata, ActivityType, CarbonActivity, NewCarbonActivity, UserScore, VehicleModel,
};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tracker", get(get_tracker))
        .route("/tracker/activities", post(log_activity))
        .route("/tracker/vehicles", get(list_vehicles))
}

// ─── Tracker Summary ─────────────────────────────────────────

#[derive(Serialize)]
pub struct TrackerResponse {
    pub activities: Vec<CarbonActivity>,
    /// Lifetime logged emissions (kg CO₂)
    pub total_co2_kg: f64,
    /// This week's daily average (kg CO₂)
    pub average_daily_kg: f64,
    /// Mon-Sun series for the weekly chart
    pub weekly_data: Vec<f64>,
}

/// Get the activity log plus weekly summary numbers.
async fn get_tracker(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TrackerResponse>> {
    let token = &user.access_token;

    let activities = state.db.get_activities(token, user.user_id, None).await?;
    let total_co2_kg = state.db.sum_activity_co2(token, user.user_id).await?;

    let score = state
        .db
        .get_user_score(token, user.user_id)
        .await?
        .unwrap_or_else(|| UserScore::new(user.user_id, Utc::now()));

    Ok(Json(TrackerResponse {
        activities,
        total_co2_kg,
        average_daily_kg: score.average_daily(),
        weekly_data: score.weekly_data,
    }))
}

// ─── Activity Logging ────────────────────────────────────────

#[derive(Deserialize)]
pub struct LogActivityRequest {
    pub activity_type: ActivityType,
    /// Amount in the activity's unit (km, kWh or kg)
    pub distance_value: f64,
    /// Specific vehicle for vehicle trips (catalog ID)
    #[serde(default)]
    pub vehicle_model_id: Option<Uuid>,
    /// Defaults to now when the client doesn't backdate
    #[serde(default)]
    pub activity_date: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct LogActivityResponse {
    pub activity: CarbonActivity,
    /// Updated score after applying the activity
    pub score: UserScore,
}

/// Log an activity: estimate its footprint, store it, update the score.
///
/// The estimate itself never fails the request; when the estimate
/// provider is unreachable the stored row is tagged with the fallback
/// source instead.
async fn log_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<LogActivityRequest>,
) -> Result<Json<LogActivityResponse>> {
    check_distance(req.distance_value)?;

    let token = &user.access_token;
    let activity_date = req.activity_date.unwrap_or_else(Utc::now);

    let estimate = state
        .carbon
        .estimate(req.activity_type, req.distance_value, req.vehicle_model_id)
        .await;

    tracing::debug!(
        user_id = %user.user_id,
        activity_type = req.activity_type.as_str(),
        distance_value = req.distance_value,
        co2_kg = estimate.co2_kg,
        source = ?estimate.source,
        "Logging carbon activity"
    );

    let activity = state
        .db
        .insert_activity(
            token,
            &NewCarbonActivity {
                user_id: user.user_id,
                activity_type: req.activity_type,
                distance_value: req.distance_value,
                co2_kg: estimate.co2_kg,
                activity_date,
                metadata: ActivityMetadata {
                    source: estimate.source,
                    vehicle_model_id: req.vehicle_model_id,
                },
            },
        )
        .await?;

    let mut score = state
        .db
        .get_user_score(token, user.user_id)
        .await?
        .unwrap_or_else(|| UserScore::new(user.user_id, activity_date));
    score.apply_activity(estimate.co2_kg, activity_date);
    state.db.upsert_user_score(token, &score).await?;

    Ok(Json(LogActivityResponse { activity, score }))
}

fn check_distance(value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::Validation(
            "distance_value must be a positive number".to_string(),
        ));
    }
    Ok(())
}

// ─── Vehicle Catalog ─────────────────────────────────────────

#[derive(Serialize)]
pub struct VehiclesResponse {
    pub vehicles: Vec<VehicleModel>,
}

/// List the vehicle models available for vehicle trip estimates.
async fn list_vehicles(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
) -> Result<Json<VehiclesResponse>> {
    let vehicles = state.db.list_vehicle_models().await?;
    Ok(Json(VehiclesResponse { vehicles }))
}
