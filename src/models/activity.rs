// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Carbon activity model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of emission-producing activity being logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Vehicle,
    Flight,
    Electricity,
    Shipping,
}

impl ActivityType {
    /// Stable string form used in storage and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Vehicle => "vehicle",
            ActivityType::Flight => "flight",
            ActivityType::Electricity => "electricity",
            ActivityType::Shipping => "shipping",
        }
    }

    /// Unit the `distance_value` is expressed in for this activity type.
    pub fn unit(&self) -> &'static str {
        match self {
            ActivityType::Vehicle | ActivityType::Flight => "km",
            ActivityType::Electricity => "kwh",
            ActivityType::Shipping => "kg",
        }
    }
}

/// Which path produced a carbon estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateSource {
    /// The external estimate service answered.
    Api,
    /// The service was unreachable; the fixed-factor formula was used.
    Fallback,
}

/// Estimation details recorded alongside each activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityMetadata {
    /// Which path produced `co2_kg`
    pub source: EstimateSource,
    /// Vehicle model the estimate was computed against (vehicle type only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_model_id: Option<Uuid>,
}

/// Stored activity record in the `carbon_activities` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarbonActivity {
    /// Row ID
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// What kind of activity this was
    pub activity_type: ActivityType,
    /// Quantity in the type's unit (km, kWh or kg)
    pub distance_value: f64,
    /// Estimated emissions in kg CO₂
    pub co2_kg: f64,
    /// When the activity happened
    pub activity_date: DateTime<Utc>,
    /// Estimation details (source tag, vehicle model)
    pub metadata: ActivityMetadata,
}

/// Insert payload for `carbon_activities` (the store assigns the row ID).
#[derive(Debug, Clone, Serialize)]
pub struct NewCarbonActivity {
    pub user_id: Uuid,
    pub activity_type: ActivityType,
    pub distance_value: f64,
    pub co2_kg: f64,
    pub activity_date: DateTime<Utc>,
    pub metadata: ActivityMetadata,
}
