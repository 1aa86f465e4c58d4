// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod center;
pub mod listing;
pub mod scan;
pub mod score;
pub mod stats;
pub mod user;
pub mod vehicle;

pub use activity::{ActivityMetadata, ActivityType, CarbonActivity, EstimateSource, NewCarbonActivity};
pub use center::RecyclingCenter;
pub use listing::{Listing, NewListing};
pub use scan::{BarcodeScan, NewBarcodeScan, ScanRefresh};
pub use score::UserScore;
pub use stats::GlobalStats;
pub use user::User;
pub use vehicle::VehicleModel;
