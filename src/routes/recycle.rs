// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recycling guide routes: material handbook and nearby-center search.

use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::RecyclingCenter;
use crate::services::overpass::{is_ladder_radius, RADIUS_LADDER_METERS};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recycle", get(get_guide))
        .route("/recycle/centers", get(find_centers))
}

// ─── Material Handbook ───────────────────────────────────────

#[derive(Serialize)]
pub struct MaterialCategory {
    pub name: &'static str,
    pub description: &'static str,
    pub tips: &'static str,
    pub examples: &'static str,
    pub detailed_tips: &'static [&'static str],
}

const MATERIAL_GUIDE: &[MaterialCategory] = &[
    MaterialCategory {
        name: "Glass",
        description: "Glass can be recycled endlessly without loss of quality.",
        tips: "Rinse containers before recycling. Separate by color if required.",
        examples: "Beer bottles, wine bottles, jam jars, pickle jars, sauce bottles",
        detailed_tips: &[
            "Remove caps and lids before recycling",
            "Rinse containers to remove food residue",
            "Don't break glass before recycling",
            "Separate by color if required in your area",
            "Don't include light bulbs or window glass",
        ],
    },
    MaterialCategory {
        name: "Paper",
        description: "Recycling paper saves trees and reduces landfill waste.",
        tips: "Keep paper dry and clean. Remove any plastic or metal components.",
        examples: "Newspapers, magazines, office paper, cereal boxes, pizza boxes (if not greasy)",
        detailed_tips: &[
            "Remove any plastic windows from envelopes",
            "Flatten cardboard boxes to save space",
            "Don't recycle wet or food-soiled paper",
            "Separate different types of paper when possible",
            "Remove staples and paper clips when feasible",
        ],
    },
    MaterialCategory {
        name: "Plastic",
        description: "Recycling plastic helps reduce pollution and conserve resources.",
        tips: "Clean containers before recycling. Check resin codes for recyclability.",
        examples: "Water bottles, soda bottles, milk jugs, yogurt containers, detergent bottles",
        detailed_tips: &[
            "Check the recycling number on the bottom",
            "Rinse containers to remove food residue",
            "Remove caps and lids (recycle separately if possible)",
            "Don't bag plastic items unless specified",
            "Crush bottles to save space",
        ],
    },
    MaterialCategory {
        name: "Metal",
        description: "Metal recycling saves energy and reduces mining impacts.",
        tips: "Clean cans before recycling. Separate aluminum and steel if possible.",
        examples: "Aluminum cans, steel cans, tin cans, aluminum foil (clean), empty aerosol cans",
        detailed_tips: &[
            "Rinse cans to remove food residue",
            "Remove paper labels if easily removable",
            "Crush cans to save space",
            "Don't include aerosol cans unless completely empty",
            "Separate aluminum from steel if required",
        ],
    },
    MaterialCategory {
        name: "Textiles",
        description: "Textile recycling reduces landfill waste and water usage.",
        tips: "Donate wearable items. Recycle damaged fabrics separately.",
        examples: "Clothing, shoes, handbags, bed sheets, towels, curtains",
        detailed_tips: &[
            "Clean items before donating/recycling",
            "Separate good condition items for donation",
            "Pair shoes together",
            "Remove non-textile elements (zippers, buttons) if required",
            "Consider textile recycling programs at retail stores",
        ],
    },
    MaterialCategory {
        name: "Electronics",
        description: "E-waste contains valuable materials and hazardous substances.",
        tips: "Never throw in regular trash. Find certified e-waste recyclers.",
        examples: "Smartphones, laptops, tablets, printers, televisions, gaming consoles",
        detailed_tips: &[
            "Remove all personal data before recycling",
            "Include chargers and cables",
            "Remove batteries if possible",
            "Find certified e-waste recyclers",
            "Consider donation if items still work",
        ],
    },
    MaterialCategory {
        name: "Others",
        description: "Miscellaneous items that require special recycling.",
        tips: "Check local guidelines for specific disposal instructions.",
        examples: "Batteries, paint, chemicals, motor oil, light bulbs",
        detailed_tips: &[
            "Check local hazardous waste collection events",
            "Never mix different types of waste",
            "Store items safely until proper disposal",
            "Contact local authorities for guidance",
            "Look for manufacturer take-back programs",
        ],
    },
];

#[derive(Serialize)]
pub struct RecycleGuideResponse {
    pub categories: &'static [MaterialCategory],
    /// Radii (km) accepted by the center search
    pub radius_ladder_km: Vec<u32>,
}

/// Get the material handbook and the allowed search radii.
async fn get_guide(Extension(_user): Extension<AuthUser>) -> Json<RecycleGuideResponse> {
    Json(RecycleGuideResponse {
        categories: MATERIAL_GUIDE,
        radius_ladder_km: RADIUS_LADDER_METERS.iter().map(|m| m / 1000).collect(),
    })
}

// ─── Nearby Centers ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct CentersQuery {
    lat: f64,
    lon: f64,
    /// One of the ladder steps; widening the search is a user action
    #[serde(default = "default_radius_km")]
    radius_km: u32,
}

fn default_radius_km() -> u32 {
    50
}

#[derive(Serialize)]
pub struct CentersResponse {
    pub centers: Vec<RecyclingCenter>,
    pub radius_km: u32,
    /// Next larger ladder step, if any, for the "widen search" button
    pub next_radius_km: Option<u32>,
}

/// Find recycling centers around a coordinate.
///
/// An unreachable map service yields an empty list rather than an
/// error; the frontend offers the next ladder radius either way.
async fn find_centers(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
    Query(params): Query<CentersQuery>,
) -> Result<Json<CentersResponse>> {
    if !(-90.0..=90.0).contains(&params.lat) || !(-180.0..=180.0).contains(&params.lon) {
        return Err(AppError::BadRequest(
            "lat/lon out of range".to_string(),
        ));
    }

    let radius_meters = params.radius_km.saturating_mul(1000);
    if !is_ladder_radius(radius_meters) {
        return Err(AppError::BadRequest(format!(
            "radius_km must be one of {}",
            RADIUS_LADDER_METERS
                .iter()
                .map(|m| (m / 1000).to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    let centers = state
        .overpass
        .search_nearby(params.lat, params.lon, radius_meters)
        .await;

    tracing::debug!(
        lat = params.lat,
        lon = params.lon,
        radius_km = params.radius_km,
        found = centers.len(),
        "Recycling center search complete"
    );

    Ok(Json(CentersResponse {
        centers,
        radius_km: params.radius_km,
        next_radius_km: next_ladder_step(radius_meters),
    }))
}

/// Next larger ladder radius in km, if the current one isn't the last.
fn next_ladder_step(radius_meters: u32) -> Option<u32> {
    RADIUS_LADDER_METERS
        .iter()
        .find(|&&step| step > radius_meters)
        .map(|step| step / 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_ladder_step_escalates() {
        assert_eq!(next_ladder_step(50_000), Some(100));
        assert_eq!(next_ladder_step(400_000), Some(500));
    }

    #[test]
    fn test_next_ladder_step_ends_at_max() {
        assert_eq!(next_ladder_step(600_000), None);
    }

    #[test]
    fn test_material_guide_covers_seven_categories() {
        assert_eq!(MATERIAL_GUIDE.len(), 7);
        assert_eq!(MATERIAL_GUIDE[0].name, "Glass");
        assert_eq!(MATERIAL_GUIDE[6].name, "Others");
    }
}
