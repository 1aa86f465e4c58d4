// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reuse marketplace routes.

use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::listing::{
    parse_tags, validate_category, validate_condition, CATEGORIES, CONDITIONS,
};
use crate::models::{Listing, NewListing};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/reuse", get(list_listings).post(create_listing))
}

// ─── Browse Listings ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListingsQuery {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    max_price: Option<f64>,
}

#[derive(Serialize)]
pub struct ListingsResponse {
    pub listings: Vec<Listing>,
    /// Fixed vocabulary for the category filter and the posting form
    pub categories: &'static [&'static str],
    /// Fixed vocabulary for the condition filter and the posting form
    pub conditions: &'static [&'static str],
}

/// Browse listings, newest first, with optional filters.
async fn list_listings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListingsQuery>,
) -> Result<Json<ListingsResponse>> {
    check_filters(
        params.category.as_deref(),
        params.condition.as_deref(),
        params.max_price,
    )?;

    let listings = state
        .db
        .list_listings(
            &user.access_token,
            params.category.as_deref(),
            params.condition.as_deref(),
            params.max_price,
        )
        .await?;

    Ok(Json(ListingsResponse {
        listings,
        categories: &CATEGORIES,
        conditions: &CONDITIONS,
    }))
}

fn check_filters(
    category: Option<&str>,
    condition: Option<&str>,
    max_price: Option<f64>,
) -> Result<()> {
    if let Some(category) = category {
        if validate_category(category).is_err() {
            return Err(AppError::BadRequest(format!(
                "Unknown category filter '{}'",
                category
            )));
        }
    }
    if let Some(condition) = condition {
        if validate_condition(condition).is_err() {
            return Err(AppError::BadRequest(format!(
                "Unknown condition filter '{}'",
                condition
            )));
        }
    }
    if let Some(max_price) = max_price {
        if !max_price.is_finite() || max_price < 0.0 {
            return Err(AppError::BadRequest(
                "max_price must be a non-negative number".to_string(),
            ));
        }
    }
    Ok(())
}

// ─── Post a Listing ──────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct CreateListingRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, max = 1_000_000.0, message = "price out of range"))]
    pub price: f64,
    #[serde(default)]
    pub image_url: String,
    #[validate(custom(function = validate_category))]
    pub category: String,
    #[validate(custom(function = validate_condition))]
    pub condition: String,
    #[validate(length(min = 1, message = "contact_number must not be empty"))]
    pub contact_number: String,
    #[serde(default)]
    pub location: String,
    /// Comma-separated, e.g. "vintage, oak, refurbished"
    #[serde(default)]
    pub tags: String,
}

/// Post a new listing.
///
/// Rejected input never reaches the store; the row only exists once the
/// whole form validates.
async fn create_listing(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateListingRequest>,
) -> Result<Json<Listing>> {
    req.validate()?;

    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }

    let listing = state
        .db
        .insert_listing(
            &user.access_token,
            &NewListing {
                user_id: user.user_id,
                title: title.to_string(),
                description: req.description.trim().to_string(),
                price: req.price,
                image_url: req.image_url.trim().to_string(),
                category: req.category,
                condition: req.condition,
                contact_number: req.contact_number.trim().to_string(),
                location: req.location.trim().to_string(),
                tags: parse_tags(&req.tags),
            },
        )
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        listing_id = %listing.id,
        category = %listing.category,
        "Listing created"
    );

    Ok(Json(listing))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_accept_known_vocabulary() {
        assert!(check_filters(Some("Furniture"), Some("Like New"), Some(25.0)).is_ok());
        assert!(check_filters(None, None, None).is_ok());
    }

    #[test]
    fn test_filters_reject_unknown_category() {
        assert!(check_filters(Some("Vehicles"), None, None).is_err());
    }

    #[test]
    fn test_filters_reject_unknown_condition() {
        assert!(check_filters(None, Some("Mint"), None).is_err());
    }

    #[test]
    fn test_filters_reject_bad_max_price() {
        assert!(check_filters(None, None, Some(-1.0)).is_err());
        assert!(check_filters(None, None, Some(f64::NAN)).is_err());
    }
}
