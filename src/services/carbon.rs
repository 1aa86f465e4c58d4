// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Carbon Interface client for emission estimates.
//!
//! The estimate operation never fails: when the service is unreachable or
//! rejects the request, the declared fallback formula
//! `distance_value × factor[type]` is applied and the result is tagged so
//! callers (and stored activities) record which path produced the number.

use crate::models::{ActivityType, EstimateSource};
use anyhow::Context;
use serde::Deserialize;
use uuid::Uuid;

/// Fixed kg-CO₂-per-unit factor used when the estimate service is
/// unreachable, keyed by activity type.
pub const fn fallback_factor(activity_type: ActivityType) -> f64 {
    match activity_type {
        ActivityType::Vehicle => 0.2,
        ActivityType::Flight => 0.18,
        ActivityType::Electricity => 0.5,
        ActivityType::Shipping => 0.1,
    }
}

/// The declared fallback formula.
pub fn fallback_estimate(activity_type: ActivityType, distance_value: f64) -> f64 {
    distance_value * fallback_factor(activity_type)
}

/// An emissions estimate plus the path that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarbonEstimate {
    /// Estimated emissions in kg CO₂
    pub co2_kg: f64,
    /// API answer or local fallback formula
    pub source: EstimateSource,
}

/// Carbon Interface API client.
#[derive(Clone)]
pub struct CarbonClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CarbonClient {
    /// Create a new client against the given API base URL.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Estimate emissions for an activity. Infallible by policy: any
    /// network or HTTP failure resolves to the fallback formula.
    pub async fn estimate(
        &self,
        activity_type: ActivityType,
        distance_value: f64,
        vehicle_model_id: Option<Uuid>,
    ) -> CarbonEstimate {
        match self
            .request_estimate(activity_type, distance_value, vehicle_model_id)
            .await
        {
            Ok(co2_kg) => CarbonEstimate {
                co2_kg,
                source: EstimateSource::Api,
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    activity_type = activity_type.as_str(),
                    "Carbon estimate fell back to fixed factor"
                );
                CarbonEstimate {
                    co2_kg: fallback_estimate(activity_type, distance_value),
                    source: EstimateSource::Fallback,
                }
            }
        }
    }

    /// POST /estimates and extract `data.attributes.carbon_kg`.
    async fn request_estimate(
        &self,
        activity_type: ActivityType,
        distance_value: f64,
        vehicle_model_id: Option<Uuid>,
    ) -> anyhow::Result<f64> {
        let body = estimate_request_body(activity_type, distance_value, vehicle_model_id);

        let response = self
            .http
            .post(format!("{}/estimates", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("estimate request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("estimate returned HTTP {}: {}", status, body);
        }

        let estimate: EstimateResponse = response
            .json()
            .await
            .context("estimate response parse failed")?;

        Ok(estimate.data.attributes.carbon_kg)
    }
}

/// Build the type-specific request body the estimate service expects.
fn estimate_request_body(
    activity_type: ActivityType,
    distance_value: f64,
    vehicle_model_id: Option<Uuid>,
) -> serde_json::Value {
    match activity_type {
        ActivityType::Vehicle => serde_json::json!({
            "type": "vehicle",
            "distance_unit": "km",
            "distance_value": distance_value,
            "vehicle_model_id": vehicle_model_id,
        }),
        ActivityType::Flight => serde_json::json!({
            "type": "flight",
            "passengers": 1,
            "legs": [{
                "departure_airport": "sfo",
                "destination_airport": "yyz",
                "cabin_class": "economy",
            }],
        }),
        ActivityType::Electricity => serde_json::json!({
            "type": "electricity",
            "electricity_unit": "kwh",
            "electricity_value": distance_value,
            "country": "us",
        }),
        ActivityType::Shipping => serde_json::json!({
            "type": "shipping",
            "weight_unit": "kg",
            "weight_value": distance_value,
            "distance_unit": "km",
            "distance_value": 100,
            "transport_method": "truck",
        }),
    }
}

/// Estimate response envelope.
#[derive(Debug, Deserialize)]
struct EstimateResponse {
    data: EstimateData,
}

#[derive(Debug, Deserialize)]
struct EstimateData {
    attributes: EstimateAttributes,
}

#[derive(Debug, Deserialize)]
struct EstimateAttributes {
    carbon_kg: f64,
}
