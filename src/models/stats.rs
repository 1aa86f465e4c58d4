// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community-wide statistics shown on the home screen.

use serde::{Deserialize, Serialize};

/// Single-row community counters from the `global_stats` table.
///
/// The home screen shows these regardless of store availability, so
/// [`GlobalStats::default`] carries the fixed fallback values used when the
/// table is empty or unreachable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalStats {
    /// Community CO₂ tracked/saved (kg)
    pub co2_saved: f64,
    /// Tree-planting equivalent of the savings
    pub trees_planted: i64,
    /// Active user count
    pub users_active: i64,
    /// Waste diverted from landfill (kg)
    pub waste_reduced: f64,
}

impl Default for GlobalStats {
    fn default() -> Self {
        Self {
            co2_saved: 15420.0,
            trees_planted: 3240,
            users_active: 12580,
            waste_reduced: 8960.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_values() {
        let stats = GlobalStats::default();

        assert_eq!(stats.co2_saved, 15420.0);
        assert_eq!(stats.trees_planted, 3240);
        assert_eq!(stats.users_active, 12580);
        assert_eq!(stats.waste_reduced, 8960.0);
    }
}
