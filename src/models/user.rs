//! User model for the session API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated user as surfaced by the session endpoints.
///
/// The record itself is owned by the hosted auth provider; this is the
/// subset carried in the access token and returned to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Provider-assigned user ID
    pub id: Uuid,
    /// Email address
    pub email: String,
    /// Display name (from signup metadata; may be absent for OAuth users)
    pub name: Option<String>,
}
