//! Database layer (Supabase PostgREST).

pub mod supabase;

pub use supabase::SupabaseDb;

/// Table names as constants.
pub mod tables {
    pub const USER_SCORES: &str = "user_scores";
    pub const CARBON_ACTIVITIES: &str = "carbon_activities";
    pub const VEHICLE_MODELS: &str = "vehicle_models";
    pub const BARCODE_SCANS: &str = "barcode_scans";
    pub const LISTINGS: &str = "listings";
    /// Community counters shown on the home screen (single row)
    pub const GLOBAL_STATS: &str = "global_stats";
}
