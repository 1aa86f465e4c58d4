// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Open Food Facts client for barcode product lookups.
//!
//! The lookup distinguishes "not in the database" (a normal outcome the
//! scanner shows as an informative message) from an upstream failure.
//! Everything else here is normalization: the provider's sparse, stringly
//! fields become a [`ProductInfo`] with a 0–100 eco score and a
//! deterministic per-unit CO₂ impact derived from it.

use crate::error::AppError;
use serde::Deserialize;

/// Fields requested from the product database.
const PRODUCT_FIELDS: &str = "product_name,brands,ecoscore_score,ecoscore_grade,image_url,\
                              ingredients_text,nutriscore_grade,packaging";

/// Base URL for provider-relative product photos.
const IMAGE_BASE: &str = "https://static.openfoodfacts.org/images/products/";

/// Eco score assumed when the provider has neither a score nor a grade.
pub const DEFAULT_ECO_SCORE: f64 = 50.0;

/// Normalized product from a barcode lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInfo {
    pub name: String,
    pub brand: Option<String>,
    /// Normalized 0–100 eco score
    pub eco_score: f64,
    /// Per-unit footprint derived from the eco score (kg CO₂)
    pub co2_impact: f64,
    pub image_url: Option<String>,
    pub ingredients_text: Option<String>,
    pub nutritional_grade: Option<String>,
    pub packaging_materials: Option<String>,
}

/// Open Food Facts API client.
#[derive(Clone)]
pub struct ProductClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProductClient {
    /// Create a new client against the given API base URL.
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Look up a product by barcode.
    ///
    /// Returns `NotFound` when the database has no such barcode (HTTP 404
    /// or a zero status flag) and `Upstream` for any other failure.
    pub async fn lookup(&self, barcode: &str) -> Result<ProductInfo, AppError> {
        let url = format!(
            "{}/api/v2/product/{}",
            self.base_url,
            urlencoding::encode(barcode)
        );

        let response = self
            .http
            .get(url)
            .query(&[("fields", PRODUCT_FIELDS)])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Product lookup failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "Product {} is not in the database",
                barcode
            )));
        }
        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Product lookup returned HTTP {}",
                response.status()
            )));
        }

        let envelope: ProductEnvelope = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Product response parse error: {}", e)))?;

        if envelope.status != 1 {
            return Err(AppError::NotFound(format!(
                "Product {} is not in the database",
                barcode
            )));
        }

        let raw = envelope.product.ok_or_else(|| {
            AppError::NotFound(format!("Product {} is not in the database", barcode))
        })?;

        Ok(normalize(raw))
    }
}

/// Map a raw provider record to the normalized form.
fn normalize(raw: RawProduct) -> ProductInfo {
    let eco_score = eco_score_from(raw.ecoscore_score, raw.ecoscore_grade.as_deref());

    ProductInfo {
        name: raw
            .product_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Unknown Product".to_string()),
        brand: raw.brands.filter(|b| !b.trim().is_empty()),
        eco_score,
        co2_impact: co2_impact_for(eco_score),
        image_url: raw.image_url.map(|u| absolute_image_url(&u)),
        ingredients_text: raw.ingredients_text,
        nutritional_grade: raw.nutriscore_grade,
        packaging_materials: raw.packaging,
    }
}

/// 0–100 eco score from the provider's numeric score or letter grade.
///
/// A numeric score wins outright. Otherwise grades a–d map to fixed
/// values, any other grade (e, unknown) to 25, and a record with neither
/// to [`DEFAULT_ECO_SCORE`].
fn eco_score_from(score: Option<f64>, grade: Option<&str>) -> f64 {
    if let Some(score) = score {
        return score;
    }
    match grade.map(|g| g.to_ascii_lowercase()) {
        Some(g) if g == "a" => 85.0,
        Some(g) if g == "b" => 70.0,
        Some(g) if g == "c" => 55.0,
        Some(g) if g == "d" => 40.0,
        Some(_) => 25.0,
        None => DEFAULT_ECO_SCORE,
    }
}

/// Per-unit CO₂ impact (kg) derived from the eco score.
///
/// Linear from 2.5 kg at score 0 down to 0.5 kg at score 100, clamped to
/// that range for out-of-band scores.
fn co2_impact_for(eco_score: f64) -> f64 {
    (2.5 - eco_score / 50.0).clamp(0.5, 2.5)
}

/// Expand provider-relative image paths to absolute URLs.
fn absolute_image_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{}{}", IMAGE_BASE, url.trim_start_matches('/'))
    }
}

/// Lookup response envelope.
#[derive(Debug, Deserialize)]
struct ProductEnvelope {
    #[serde(default)]
    status: i32,
    product: Option<RawProduct>,
}

/// Raw product record as the provider returns it.
#[derive(Debug, Default, Deserialize)]
struct RawProduct {
    product_name: Option<String>,
    brands: Option<String>,
    ecoscore_score: Option<f64>,
    ecoscore_grade: Option<String>,
    image_url: Option<String>,
    ingredients_text: Option<String>,
    nutriscore_grade: Option<String>,
    packaging: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_score_wins() {
        assert_eq!(eco_score_from(Some(63.0), Some("d")), 63.0);
    }

    #[test]
    fn test_grade_mapping() {
        assert_eq!(eco_score_from(None, Some("a")), 85.0);
        assert_eq!(eco_score_from(None, Some("B")), 70.0);
        assert_eq!(eco_score_from(None, Some("c")), 55.0);
        assert_eq!(eco_score_from(None, Some("d")), 40.0);
        assert_eq!(eco_score_from(None, Some("e")), 25.0);
        assert_eq!(eco_score_from(None, None), DEFAULT_ECO_SCORE);
    }

    #[test]
    fn test_co2_impact_tracks_eco_score() {
        assert_eq!(co2_impact_for(0.0), 2.5);
        assert_eq!(co2_impact_for(100.0), 0.5);
        assert!(co2_impact_for(85.0) < co2_impact_for(40.0));
        // Clamped for out-of-band provider scores
        assert_eq!(co2_impact_for(150.0), 0.5);
    }

    #[test]
    fn test_absolute_image_url() {
        assert_eq!(
            absolute_image_url("https://example.com/p.jpg"),
            "https://example.com/p.jpg"
        );
        assert_eq!(
            absolute_image_url("/123/front.jpg"),
            format!("{}123/front.jpg", IMAGE_BASE)
        );
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let info = normalize(RawProduct {
            brands: Some("  ".to_string()),
            ..Default::default()
        });

        assert_eq!(info.name, "Unknown Product");
        assert_eq!(info.brand, None);
        assert_eq!(info.eco_score, DEFAULT_ECO_SCORE);
        assert_eq!(info.co2_impact, 1.5);
    }

    #[tokio::test]
    async fn test_unreachable_is_upstream_not_notfound() {
        let client = ProductClient::new("http://127.0.0.1:1".to_string());

        let err = client.lookup("737628064502").await.unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
    }
}
