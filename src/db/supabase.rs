// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase PostgREST client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - User scores (per-user gamification aggregate)
//! - Carbon activities (append-only emissions log)
//! - Barcode scans (upserted by user + barcode)
//! - Listings (reuse marketplace)
//! - Vehicle models and global stats (read-only reference data)
//!
//! Requests carry the project's public API key plus, for user-scoped
//! operations, the caller's access token so the store's row-level
//! security applies.

use crate::db::tables;
use crate::error::AppError;
use crate::models::{
    BarcodeScan, CarbonActivity, GlobalStats, Listing, NewBarcodeScan, NewCarbonActivity,
    NewListing, ScanRefresh, UserScore, VehicleModel,
};
use reqwest::Method;
use serde::Deserialize;
use uuid::Uuid;

/// Supabase database client.
#[derive(Clone)]
pub struct SupabaseDb {
    client: Option<RestClient>,
}

/// Inner REST client (present only when online).
#[derive(Clone)]
struct RestClient {
    http: reqwest::Client,
    rest_url: String,
    anon_key: String,
}

impl SupabaseDb {
    /// Create a new client for a Supabase project.
    pub fn new(supabase_url: &str, anon_key: &str) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Database(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client: Some(RestClient {
                http,
                rest_url: format!("{}/rest/v1", supabase_url.trim_end_matches('/')),
                anon_key: anon_key.to_string(),
            }),
        })
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&RestClient, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Score Operations ───────────────────────────────────

    /// Get the score row for a user, if one exists yet.
    pub async fn get_user_score(
        &self,
        token: &str,
        user_id: Uuid,
    ) -> Result<Option<UserScore>, AppError> {
        let response = self
            .get_client()?
            .request(Method::GET, tables::USER_SCORES, Some(token))
            .query(&[
                ("user_id", format!("eq.{}", user_id)),
                ("limit", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut rows: Vec<UserScore> = read_rows(response).await?;
        Ok(rows.pop())
    }

    /// Create or update the score row for a user.
    pub async fn upsert_user_score(&self, token: &str, score: &UserScore) -> Result<(), AppError> {
        let response = self
            .get_client()?
            .request(Method::POST, tables::USER_SCORES, Some(token))
            .query(&[("on_conflict", "user_id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(score)
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        check_response(response).await?;
        Ok(())
    }

    // ─── Carbon Activity Operations ──────────────────────────────

    /// Append a logged activity, returning the stored row.
    pub async fn insert_activity(
        &self,
        token: &str,
        activity: &NewCarbonActivity,
    ) -> Result<CarbonActivity, AppError> {
        let response = self
            .get_client()?
            .request(Method::POST, tables::CARBON_ACTIVITIES, Some(token))
            .header("Prefer", "return=representation")
            .json(activity)
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut rows: Vec<CarbonActivity> = read_rows(response).await?;
        rows.pop()
            .ok_or_else(|| AppError::Database("Activity insert returned no row".to_string()))
    }

    /// Get a user's activities, newest first, optionally limited.
    pub async fn get_activities(
        &self,
        token: &str,
        user_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<CarbonActivity>, AppError> {
        let mut params = vec![
            ("user_id", format!("eq.{}", user_id)),
            ("order", "activity_date.desc".to_string()),
        ];
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }

        let response = self
            .get_client()?
            .request(Method::GET, tables::CARBON_ACTIVITIES, Some(token))
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        read_rows(response).await
    }

    /// Sum of `co2_kg` across all of a user's activities.
    ///
    /// The dashboard's "CO₂ saved" figure comes from the log itself, not
    /// the score row, so the two can be compared.
    pub async fn sum_activity_co2(&self, token: &str, user_id: Uuid) -> Result<f64, AppError> {
        #[derive(Deserialize)]
        struct Co2Row {
            co2_kg: f64,
        }

        let response = self
            .get_client()?
            .request(Method::GET, tables::CARBON_ACTIVITIES, Some(token))
            .query(&[
                ("user_id", format!("eq.{}", user_id)),
                ("select", "co2_kg".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let rows: Vec<Co2Row> = read_rows(response).await?;
        Ok(rows.iter().map(|r| r.co2_kg).sum())
    }

    // ─── Vehicle Model Operations ────────────────────────────────

    /// List the static vehicle reference data.
    pub async fn list_vehicle_models(&self) -> Result<Vec<VehicleModel>, AppError> {
        let response = self
            .get_client()?
            .request(Method::GET, tables::VEHICLE_MODELS, None)
            .query(&[("order", "make.asc,model.asc")])
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        read_rows(response).await
    }

    // ─── Barcode Scan Operations ─────────────────────────────────

    /// Find an existing scan of a barcode by a user.
    pub async fn find_scan(
        &self,
        token: &str,
        user_id: Uuid,
        barcode: &str,
    ) -> Result<Option<BarcodeScan>, AppError> {
        let response = self
            .get_client()?
            .request(Method::GET, tables::BARCODE_SCANS, Some(token))
            .query(&[
                ("user_id", format!("eq.{}", user_id)),
                ("barcode", format!("eq.{}", barcode)),
                ("limit", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut rows: Vec<BarcodeScan> = read_rows(response).await?;
        Ok(rows.pop())
    }

    /// Record a first-time scan, returning the stored row.
    pub async fn insert_scan(
        &self,
        token: &str,
        scan: &NewBarcodeScan,
    ) -> Result<BarcodeScan, AppError> {
        let response = self
            .get_client()?
            .request(Method::POST, tables::BARCODE_SCANS, Some(token))
            .header("Prefer", "return=representation")
            .json(scan)
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut rows: Vec<BarcodeScan> = read_rows(response).await?;
        rows.pop()
            .ok_or_else(|| AppError::Database("Scan insert returned no row".to_string()))
    }

    /// Refresh an existing scan row after a rescan.
    pub async fn refresh_scan(
        &self,
        token: &str,
        scan_id: Uuid,
        refresh: &ScanRefresh,
    ) -> Result<(), AppError> {
        let response = self
            .get_client()?
            .request(Method::PATCH, tables::BARCODE_SCANS, Some(token))
            .query(&[("id", format!("eq.{}", scan_id))])
            .header("Prefer", "return=minimal")
            .json(refresh)
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        check_response(response).await?;
        Ok(())
    }

    /// Get a user's most recent scans, newest first.
    pub async fn recent_scans(
        &self,
        token: &str,
        user_id: Uuid,
        limit: u32,
    ) -> Result<Vec<BarcodeScan>, AppError> {
        let response = self
            .get_client()?
            .request(Method::GET, tables::BARCODE_SCANS, Some(token))
            .query(&[
                ("user_id", format!("eq.{}", user_id)),
                ("order", "scan_date.desc".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        read_rows(response).await
    }

    /// Count all scans a user has recorded.
    ///
    /// Uses PostgREST's exact-count header with a zero-length range so no
    /// row bodies travel over the wire.
    pub async fn count_scans(&self, token: &str, user_id: Uuid) -> Result<u64, AppError> {
        let response = self
            .get_client()?
            .request(Method::GET, tables::BARCODE_SCANS, Some(token))
            .query(&[
                ("user_id", format!("eq.{}", user_id)),
                ("select", "id".to_string()),
            ])
            .header("Prefer", "count=exact")
            .header("Range-Unit", "items")
            .header("Range", "0-0")
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let response = check_response(response).await?;
        let count = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit('/').next())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        Ok(count)
    }

    // ─── Listing Operations ──────────────────────────────────────

    /// List marketplace listings, newest first, with optional filters.
    pub async fn list_listings(
        &self,
        token: &str,
        category: Option<&str>,
        condition: Option<&str>,
        max_price: Option<f64>,
    ) -> Result<Vec<Listing>, AppError> {
        let mut params = vec![("order", "created_at.desc".to_string())];
        if let Some(category) = category {
            params.push(("category", format!("eq.{}", category)));
        }
        if let Some(condition) = condition {
            params.push(("condition", format!("eq.{}", condition)));
        }
        if let Some(max_price) = max_price {
            params.push(("price", format!("lte.{}", max_price)));
        }

        let response = self
            .get_client()?
            .request(Method::GET, tables::LISTINGS, Some(token))
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        read_rows(response).await
    }

    /// Create a listing, returning the stored row.
    pub async fn insert_listing(
        &self,
        token: &str,
        listing: &NewListing,
    ) -> Result<Listing, AppError> {
        let response = self
            .get_client()?
            .request(Method::POST, tables::LISTINGS, Some(token))
            .header("Prefer", "return=representation")
            .json(listing)
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut rows: Vec<Listing> = read_rows(response).await?;
        rows.pop()
            .ok_or_else(|| AppError::Database("Listing insert returned no row".to_string()))
    }

    // ─── Global Stats Operations ─────────────────────────────────

    /// Get the community counters row, if present.
    pub async fn get_global_stats(&self) -> Result<Option<GlobalStats>, AppError> {
        let response = self
            .get_client()?
            .request(Method::GET, tables::GLOBAL_STATS, None)
            .query(&[
                (
                    "select",
                    "co2_saved,trees_planted,users_active,waste_reduced",
                ),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut rows: Vec<GlobalStats> = read_rows(response).await?;
        Ok(rows.pop())
    }
}

impl RestClient {
    /// Build a request against a table with auth headers attached.
    ///
    /// `token` is the caller's access token for user-scoped operations;
    /// anonymous reads fall back to the project key.
    fn request(
        &self,
        method: Method,
        table: &str,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.rest_url, table))
            .header("apikey", self.anon_key.clone())
            .bearer_auth(token.unwrap_or(&self.anon_key))
    }
}

/// Check response status and return error if not successful.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AppError::Database(format!("HTTP {}: {}", status, body)))
}

/// Check response status and parse the JSON row array.
async fn read_rows<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<Vec<T>, AppError> {
    let response = check_response(response).await?;
    response
        .json()
        .await
        .map_err(|e| AppError::Database(format!("JSON parse error: {}", e)))
}
