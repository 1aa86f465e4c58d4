// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session authentication middleware.
//!
//! Sessions are provider-issued access tokens (HS256 JWTs) carried in an
//! HttpOnly cookie, with a bearer header accepted as a fallback for
//! non-browser clients. The token is verified here on every request; no
//! token state is kept server-side and refresh stays with the provider.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Session cookie holding the provider access token (HttpOnly).
pub const SESSION_COOKIE: &str = "garv_token";

/// JS-readable hint cookie mirroring session presence.
pub const LOGGED_IN_COOKIE: &str = "garv_logged_in";

/// Short-lived cookie carrying the PKCE verifier across the OAuth redirect.
pub const VERIFIER_COOKIE: &str = "garv_oauth_verifier";

/// Claims of a provider-issued access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (provider user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Signup metadata (display name)
    #[serde(default)]
    pub user_metadata: ClaimsMetadata,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ClaimsMetadata {
    #[serde(default)]
    pub name: Option<String>,
}

/// Authenticated user extracted from a verified session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    /// The raw access token, forwarded to the store for row-level security
    pub access_token: String,
}

/// Middleware guarding the protected screen routes.
///
/// Anonymous requests are redirected to `/auth` rather than rejected, so
/// the browser lands on the sign-in screen.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, Redirect> {
    let Some(user) = authenticate(&state, &jar, request.headers()) else {
        return Err(Redirect::to("/auth"));
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Resolve the current session, if any. Shared by the auth guard and the
/// session-status endpoint (which must not redirect).
pub fn authenticate(state: &AppState, jar: &CookieJar, headers: &HeaderMap) -> Option<AuthUser> {
    let token = session_token(jar, headers)?;
    decode_session(&token, &state.config.supabase_jwt_secret)
}

/// Token from the session cookie, else from a bearer header.
fn session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Verify a token's signature and expiry and extract the user.
pub fn decode_session(token: &str, secret: &[u8]) -> Option<AuthUser> {
    let key = DecodingKey::from_secret(secret);
    let validation = Validation::new(Algorithm::HS256);

    let data = decode::<Claims>(token, &key, &validation).ok()?;
    let user_id = data.claims.sub.parse().ok()?;

    Some(AuthUser {
        user_id,
        email: data.claims.email.unwrap_or_default(),
        name: data.claims.user_metadata.name,
        access_token: token.to_string(),
    })
}
