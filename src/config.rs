// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! All provider credentials come from the environment at process start and
//! are injected into the gateway clients; nothing sensitive is literal in
//! source.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Hosted backend (auth + tables) ---
    /// Supabase project base URL (e.g. https://xyz.supabase.co)
    pub supabase_url: String,
    /// Supabase public (anon) API key
    pub supabase_anon_key: String,
    /// HS256 secret used to verify Supabase-issued access tokens
    pub supabase_jwt_secret: Vec<u8>,

    // --- External estimate/lookup providers ---
    /// Carbon Interface bearer token
    pub carbon_api_key: String,
    /// Carbon Interface base URL
    pub carbon_api_url: String,
    /// OCR.space API key (free-tier default for local dev)
    pub ocr_api_key: String,
    /// OCR.space parse endpoint
    pub ocr_api_url: String,
    /// Open Food Facts base URL
    pub off_url: String,
    /// Overpass interpreter endpoint
    pub overpass_url: String,

    // --- Service identity ---
    /// HMAC key for signing OAuth state parameters
    pub state_signing_key: Vec<u8>,
    /// Frontend URL for CORS and post-auth redirects
    pub frontend_url: String,
    /// Public base URL of this API (OAuth callback target)
    pub api_base_url: String,
    /// Server port
    pub port: u16,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test_anon_key".to_string(),
            supabase_jwt_secret: b"test_jwt_secret_32_bytes_minimum".to_vec(),
            carbon_api_key: "test_carbon_key".to_string(),
            carbon_api_url: "http://localhost:54322/api/v1".to_string(),
            ocr_api_key: "helloworld".to_string(),
            ocr_api_url: "http://localhost:54325/parse/image".to_string(),
            off_url: "http://localhost:54323".to_string(),
            overpass_url: "http://localhost:54324/api/interpreter".to_string(),
            state_signing_key: b"test_state_key_32_bytes_minimum!".to_vec(),
            frontend_url: "http://localhost:5173".to_string(),
            api_base_url: "http://localhost:8080".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            supabase_url: env::var("SUPABASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_URL"))?,
            supabase_anon_key: env::var("SUPABASE_ANON_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_ANON_KEY"))?,
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .map_err(|_| ConfigError::Missing("SUPABASE_JWT_SECRET"))?
                .into_bytes(),

            carbon_api_key: env::var("CARBON_INTERFACE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("CARBON_INTERFACE_API_KEY"))?,
            carbon_api_url: env::var("CARBON_INTERFACE_URL")
                .unwrap_or_else(|_| "https://www.carboninterface.com/api/v1".to_string()),
            ocr_api_key: env::var("OCR_SPACE_API_KEY")
                .unwrap_or_else(|_| "helloworld".to_string()),
            ocr_api_url: env::var("OCR_SPACE_URL")
                .unwrap_or_else(|_| "https://api.ocr.space/parse/image".to_string()),
            off_url: env::var("OPENFOODFACTS_URL")
                .unwrap_or_else(|_| "https://world.openfoodfacts.org".to_string()),
            overpass_url: env::var("OVERPASS_URL")
                .unwrap_or_else(|_| "https://overpass-api.de/api/interpreter".to_string()),

            state_signing_key: env::var("STATE_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("STATE_SIGNING_KEY"))?
                .into_bytes(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("SUPABASE_URL", "https://test.supabase.co/");
        env::set_var("SUPABASE_ANON_KEY", "anon_key");
        env::set_var("SUPABASE_JWT_SECRET", "jwt_secret_32_bytes_minimum_okay");
        env::set_var("CARBON_INTERFACE_API_KEY", "carbon_key");
        env::set_var("STATE_SIGNING_KEY", "state_key_32_bytes_minimum_okay!");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.supabase_url, "https://test.supabase.co");
        assert_eq!(config.supabase_anon_key, "anon_key");
        assert_eq!(config.ocr_api_key, "helloworld");
        assert_eq!(config.port, 8080);
    }
}
