// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Barcode scan model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored scan record in the `barcode_scans` table.
///
/// Scans are upserted by `(user_id, barcode)`: rescanning a product
/// refreshes the existing row instead of inserting a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarcodeScan {
    /// Row ID
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// EAN/UPC barcode as scanned
    pub barcode: String,
    /// Product name from the product database
    pub product_name: String,
    /// Brand name (may be absent in the product database)
    pub brand: Option<String>,
    /// Normalized 0–100 eco score
    pub eco_score: f64,
    /// Estimated footprint per unit (kg CO₂)
    pub co2_impact: f64,
    /// Product photo URL
    pub image_url: Option<String>,
    /// Ingredient list text
    pub ingredients_text: Option<String>,
    /// Nutritional grade letter (a–e)
    pub nutritional_grade: Option<String>,
    /// Packaging materials description
    pub packaging_materials: Option<String>,
    /// Most recent scan time
    pub scan_date: DateTime<Utc>,
}

/// Insert payload for `barcode_scans` (the store assigns the row ID).
#[derive(Debug, Clone, Serialize)]
pub struct NewBarcodeScan {
    pub user_id: Uuid,
    pub barcode: String,
    pub product_name: String,
    pub brand: Option<String>,
    pub eco_score: f64,
    pub co2_impact: f64,
    pub image_url: Option<String>,
    pub ingredients_text: Option<String>,
    pub nutritional_grade: Option<String>,
    pub packaging_materials: Option<String>,
    pub scan_date: DateTime<Utc>,
}

/// Fields refreshed when an already-scanned barcode is scanned again.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRefresh {
    pub scan_date: DateTime<Utc>,
    pub eco_score: f64,
    pub co2_impact: f64,
    pub image_url: Option<String>,
}
