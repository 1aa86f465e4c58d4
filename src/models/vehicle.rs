//! Vehicle model reference data.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Static vehicle reference row from the `vehicle_models` table.
///
/// Read-only; used to pick a model for vehicle carbon estimates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleModel {
    /// Row ID (also the estimate service's model ID)
    pub id: Uuid,
    /// Manufacturer
    pub make: String,
    /// Model name
    pub model: String,
    /// Model year
    pub year: i32,
    /// Fuel type (petrol, diesel, electric, hybrid)
    pub fuel_type: String,
    /// Reference emissions per km (kg CO₂)
    pub co2_per_km: f64,
}
