// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reuse marketplace listing model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidationError;

/// Listing categories offered by the marketplace form.
pub const CATEGORIES: [&str; 7] = [
    "Electronics",
    "Furniture",
    "Clothing",
    "Books",
    "Toys",
    "Home Appliances",
    "Other",
];

/// Item condition vocabulary.
pub const CONDITIONS: [&str; 5] = ["New", "Like New", "Good", "Fair", "Needs Repair"];

/// Stored listing record in the `listings` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Row ID
    pub id: Uuid,
    /// Seller
    pub user_id: Uuid,
    /// Item title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Asking price; 0 means free pickup
    pub price: f64,
    /// Item photo URL
    pub image_url: String,
    /// One of [`CATEGORIES`]
    pub category: String,
    /// One of [`CONDITIONS`]
    pub condition: String,
    /// Seller contact phone number
    pub contact_number: String,
    /// Pickup location (free text)
    pub location: String,
    /// Search tags
    pub tags: Vec<String>,
    /// When the listing was posted
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `listings` (ID and timestamp assigned by the store).
#[derive(Debug, Clone, Serialize)]
pub struct NewListing {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub category: String,
    pub condition: String,
    pub contact_number: String,
    pub location: String,
    pub tags: Vec<String>,
}

/// Split a raw comma-separated tag string into clean tags.
///
/// Whitespace around each tag is trimmed and empty entries are dropped.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validator hook: category must come from the fixed vocabulary.
pub fn validate_category(category: &str) -> Result<(), ValidationError> {
    if CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_category"))
    }
}

/// Validator hook: condition must come from the fixed vocabulary.
pub fn validate_condition(condition: &str) -> Result<(), ValidationError> {
    if CONDITIONS.contains(&condition) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_condition"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_trims_and_drops_empties() {
        let tags = parse_tags(" vintage , oak,, chair ,");

        assert_eq!(tags, vec!["vintage", "oak", "chair"]);
    }

    #[test]
    fn test_parse_tags_empty_input() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags("  ,  , ").is_empty());
    }

    #[test]
    fn test_category_vocabulary() {
        assert!(validate_category("Furniture").is_ok());
        assert!(validate_category("Spaceships").is_err());
    }

    #[test]
    fn test_condition_vocabulary() {
        assert!(validate_condition("Like New").is_ok());
        assert!(validate_condition("Mint").is_err());
    }
}
