// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Product scanner routes: barcode lookup and label OCR.

use axum::{
    extract::{Multipart, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{BarcodeScan, NewBarcodeScan, ScanRefresh};
use crate::services::ocr::PARSE_FAILED;
use crate::AppState;

/// How many history entries the scanner screen shows.
const RECENT_SCAN_COUNT: u32 = 5;

/// Well-known products for the "try these" chips on the scanner screen.
const DEMO_BARCODES: &[&str] = &[
    "5449000000996",
    "3017620422003",
    "8000500310427",
    "7613035939849",
];

#[derive(Serialize)]
pub struct EcoTip {
    pub title: &'static str,
    pub tip: &'static str,
}

const ECO_TIPS: &[EcoTip] = &[
    EcoTip {
        title: "Choose Minimal Packaging",
        tip: "Opt for products with less packaging or packaging that's easily recyclable.",
    },
    EcoTip {
        title: "Buy in Bulk",
        tip: "Purchasing larger quantities reduces packaging waste per unit.",
    },
    EcoTip {
        title: "Look for Recycled Content",
        tip: "Products made from recycled materials have a lower environmental impact.",
    },
];

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/scan", get(get_scanner).post(scan_barcode))
        .route("/scan/label", post(scan_label))
}

// ─── Scanner Screen ──────────────────────────────────────────

#[derive(Serialize)]
pub struct ScannerResponse {
    pub recent_scans: Vec<BarcodeScan>,
    pub demo_barcodes: &'static [&'static str],
    pub eco_tips: &'static [EcoTip],
}

/// Get the scanner screen data: scan history plus static helper content.
async fn get_scanner(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ScannerResponse>> {
    let recent_scans = state
        .db
        .recent_scans(&user.access_token, user.user_id, RECENT_SCAN_COUNT)
        .await?;

    Ok(Json(ScannerResponse {
        recent_scans,
        demo_barcodes: DEMO_BARCODES,
        eco_tips: ECO_TIPS,
    }))
}

// ─── Barcode Lookup ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct ScanRequest {
    pub barcode: String,
}

#[derive(Serialize)]
pub struct ScanResponse {
    pub scan: BarcodeScan,
    /// False when this barcode was already in the user's history
    pub first_scan: bool,
}

/// Look up a barcode and record the scan.
///
/// An unknown barcode is a 404 and leaves no history row. A repeat scan
/// of a known barcode refreshes the stored footprint figures instead of
/// duplicating the row.
async fn scan_barcode(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<ScanResponse>> {
    let barcode = req.barcode.trim().to_string();
    if barcode.is_empty() {
        return Err(AppError::Validation("barcode must not be empty".to_string()));
    }

    let token = &user.access_token;
    let product = state.products.lookup(&barcode).await?;

    tracing::debug!(
        user_id = %user.user_id,
        barcode = %barcode,
        product = %product.name,
        eco_score = product.eco_score,
        "Barcode resolved"
    );

    let now = Utc::now();
    let (scan, first_scan) = match state.db.find_scan(token, user.user_id, &barcode).await? {
        Some(mut existing) => {
            let refresh = ScanRefresh {
                scan_date: now,
                eco_score: product.eco_score,
                co2_impact: product.co2_impact,
                image_url: product.image_url.clone(),
            };
            state.db.refresh_scan(token, existing.id, &refresh).await?;

            existing.scan_date = now;
            existing.eco_score = product.eco_score;
            existing.co2_impact = product.co2_impact;
            existing.image_url = product.image_url;
            (existing, false)
        }
        None => {
            let inserted = state
                .db
                .insert_scan(
                    token,
                    &NewBarcodeScan {
                        user_id: user.user_id,
                        barcode,
                        product_name: product.name,
                        brand: product.brand,
                        eco_score: product.eco_score,
                        co2_impact: product.co2_impact,
                        image_url: product.image_url,
                        ingredients_text: product.ingredients_text,
                        nutritional_grade: product.nutritional_grade,
                        packaging_materials: product.packaging_materials,
                        scan_date: now,
                    },
                )
                .await?;
            (inserted, true)
        }
    };

    Ok(Json(ScanResponse { scan, first_scan }))
}

// ─── Label OCR ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct LabelScanResponse {
    /// Extracted text, or the fixed parse-failure sentinel
    pub text: String,
    pub parsed: bool,
}

/// Extract text from an uploaded label photo.
///
/// Expects a multipart form with the photo in an `image` field. OCR
/// trouble degrades to the sentinel text rather than an error so the
/// scanner screen keeps working.
async fn scan_label(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<LabelScanResponse>> {
    let mut image: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() == Some("image") {
            let filename = field.file_name().unwrap_or("label.jpg").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read image field: {}", e)))?;
            image = Some((data.to_vec(), filename));
            break;
        }
    }

    let (data, filename) = image.ok_or_else(|| {
        AppError::BadRequest("Missing 'image' field in multipart payload".to_string())
    })?;

    if data.is_empty() {
        return Err(AppError::Validation("Image upload is empty".to_string()));
    }

    tracing::debug!(user_id = %user.user_id, bytes = data.len(), "Running label OCR");

    let text = state.ocr.extract_text(data, &filename).await;
    let parsed = text != PARSE_FAILED;

    Ok(Json(LabelScanResponse { text, parsed }))
}
