// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - outbound gateway clients.
//!
//! Each client wraps one external provider and carries its declared
//! failure policy (fixed-formula fallback, sentinel text, or empty
//! result) so handlers never see a provider outage as an error.

pub mod auth;
pub mod carbon;
pub mod ocr;
pub mod overpass;
pub mod product;

pub use auth::{AuthClient, ProviderSession, SignupOutcome};
pub use carbon::{CarbonClient, CarbonEstimate};
pub use ocr::OcrClient;
pub use overpass::OverpassClient;
pub use product::ProductClient;
