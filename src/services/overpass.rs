// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Overpass client for finding nearby recycling facilities.
//!
//! Issues one `amenity=recycling` radius query and normalizes the raw
//! elements (free-form tags, node/way/relation coordinates) into
//! [`RecyclingCenter`] values sorted by great-circle distance. A failed
//! query returns an empty list, which the guide renders as an empty state.

use crate::models::RecyclingCenter;
use anyhow::Context;
use geo::{Distance, Haversine, Point};
use serde::Deserialize;
use std::collections::HashMap;

/// Search radii (meters) the guide may escalate through, smallest first.
pub const RADIUS_LADDER_METERS: [u32; 7] =
    [50_000, 100_000, 200_000, 300_000, 400_000, 500_000, 600_000];

/// Material tags the index uses for recycling facilities.
const MATERIAL_TAGS: [&str; 6] = [
    "glass",
    "paper",
    "plastic",
    "metal",
    "textiles",
    "electronics",
];

/// Whether a requested radius is one of the ladder steps.
pub fn is_ladder_radius(radius_meters: u32) -> bool {
    RADIUS_LADDER_METERS.contains(&radius_meters)
}

/// Overpass API client.
#[derive(Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    endpoint: String,
}

impl OverpassClient {
    /// Create a new client against the given interpreter endpoint.
    pub fn new(endpoint: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Find recycling facilities within `radius_meters` of a point.
    /// Returns an empty list on any failure.
    pub async fn search_nearby(
        &self,
        lat: f64,
        lon: f64,
        radius_meters: u32,
    ) -> Vec<RecyclingCenter> {
        match self.request_elements(lat, lon, radius_meters).await {
            Ok(elements) => normalize_elements(elements, lat, lon),
            Err(e) => {
                tracing::warn!(error = %e, lat, lon, radius_meters, "Recycling center search failed");
                Vec::new()
            }
        }
    }

    /// Form-encoded POST of the Overpass QL query.
    async fn request_elements(
        &self,
        lat: f64,
        lon: f64,
        radius_meters: u32,
    ) -> anyhow::Result<Vec<OverpassElement>> {
        let query = build_query(lat, lon, radius_meters);

        let response = self
            .http
            .post(&self.endpoint)
            .form(&[("data", query)])
            .send()
            .await
            .context("Overpass request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Overpass returned HTTP {}", status);
        }

        let parsed: OverpassResponse = response
            .json()
            .await
            .context("Overpass response parse failed")?;

        Ok(parsed.elements)
    }
}

/// Overpass QL for recycling amenities of all three element kinds.
fn build_query(lat: f64, lon: f64, radius_meters: u32) -> String {
    format!(
        "[out:json][timeout:25];\
         (node[\"amenity\"=\"recycling\"](around:{r},{lat},{lon});\
          way[\"amenity\"=\"recycling\"](around:{r},{lat},{lon});\
          relation[\"amenity\"=\"recycling\"](around:{r},{lat},{lon}););\
         out center;",
        r = radius_meters,
        lat = lat,
        lon = lon
    )
}

/// Normalize raw elements, attach distances, and sort nearest first.
fn normalize_elements(
    elements: Vec<OverpassElement>,
    origin_lat: f64,
    origin_lon: f64,
) -> Vec<RecyclingCenter> {
    let origin = Point::new(origin_lon, origin_lat);

    let mut centers: Vec<RecyclingCenter> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(i, element)| {
            // Ways and relations carry their coordinates in `center`
            let (lat, lon) = element.coordinates()?;

            let materials: Vec<String> = MATERIAL_TAGS
                .iter()
                .filter(|m| {
                    element
                        .tags
                        .get(&format!("recycling:{}", m))
                        .is_some_and(|v| v == "yes")
                })
                .map(|m| m.to_string())
                .collect();

            let primary_material = materials
                .first()
                .cloned()
                .unwrap_or_else(|| "others".to_string());

            let name = element
                .tags
                .get("name")
                .cloned()
                .unwrap_or_else(|| format!("Recycling Center #{}", i + 1));

            Some(RecyclingCenter {
                id: element.id,
                name,
                lat,
                lon,
                materials,
                primary_material,
                address: address_from(&element.tags),
                distance_km: Haversine.distance(origin, Point::new(lon, lat)) / 1000.0,
            })
        })
        .collect();

    centers.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    centers
}

/// Street address from `addr:*` tags, falling back to "Local area".
fn address_from(tags: &HashMap<String, String>) -> String {
    match (tags.get("addr:housenumber"), tags.get("addr:street")) {
        (Some(number), Some(street)) => format!("{} {}", number, street),
        (None, Some(street)) => street.clone(),
        _ => tags
            .get("addr:city")
            .cloned()
            .unwrap_or_else(|| "Local area".to_string()),
    }
}

/// Query response envelope.
#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

/// Raw index element (node, way or relation).
#[derive(Debug, Deserialize)]
struct OverpassElement {
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<ElementCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ElementCenter {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    /// Coordinates from the element itself or its computed center.
    fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon, &self.center) {
            (Some(lat), Some(lon), _) => Some((lat, lon)),
            (_, _, Some(center)) => Some((center.lat, center.lon)),
            _ => None,
        }
    }
}
