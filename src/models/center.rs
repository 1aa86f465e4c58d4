// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recycling center as returned by the locator.

use serde::{Deserialize, Serialize};

/// A recycling facility found near the user.
///
/// Normalized from raw geospatial index elements; not persisted anywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecyclingCenter {
    /// Element ID in the geospatial index
    pub id: i64,
    /// Facility name, or a numbered placeholder when untagged
    pub name: String,
    /// Latitude (WGS84)
    pub lat: f64,
    /// Longitude (WGS84)
    pub lon: f64,
    /// Materials the facility accepts (glass, paper, plastic, ...)
    pub materials: Vec<String>,
    /// First accepted material, used for marker color coding
    pub primary_material: String,
    /// Street address assembled from tags, or "Local area"
    pub address: String,
    /// Great-circle distance from the search origin (km)
    pub distance_km: f64,
}
