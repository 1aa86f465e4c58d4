// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session and OAuth authentication routes.
//!
//! Credential sign-in/sign-up proxy to the hosted auth provider; the
//! provider-issued access token is kept in an HttpOnly cookie so the
//! browser never handles it directly. Google sign-in runs the PKCE flow
//! with an HMAC-signed `state` parameter carrying the post-login
//! redirect target.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{authenticate, LOGGED_IN_COOKIE, SESSION_COOKIE, VERIFIER_COOKIE};
use crate::models::User;
use crate::services::{ProviderSession, SignupOutcome};
use crate::AppState;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// OAuth state parameters older than this are rejected.
const STATE_MAX_AGE_MS: u128 = 10 * 60 * 1000;

/// Lifetime of the PKCE verifier cookie; covers the provider round trip.
const VERIFIER_TTL_MINUTES: i64 = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth", get(session_status))
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .route("/auth/signout", post(sign_out))
        .route("/auth/google", get(google_start))
        .route("/auth/callback", get(google_callback))
}

// ─── Session Status ──────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Report whether the caller has a live session.
///
/// The auth screen is public; the frontend calls this to decide whether
/// to bounce an already-signed-in user back to the dashboard.
async fn session_status(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Json<SessionStatus> {
    match authenticate(&state, &jar, &headers) {
        Some(user) => Json(SessionStatus {
            authenticated: true,
            user: Some(User {
                id: user.user_id,
                email: user.email,
                name: user.name,
            }),
        }),
        None => Json(SessionStatus {
            authenticated: false,
            user: None,
        }),
    }
}

// ─── Credential Sign-in / Sign-up ────────────────────────────

#[derive(Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: User,
    /// Seconds until the session cookie expires
    pub expires_in: i64,
}

/// Sign in with email and password.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<SignInRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    req.validate()?;

    let session = state.auth.sign_in(&req.email, &req.password).await?;

    tracing::info!(user_id = %session.user.id, "User signed in");

    let response = session_response(&session);
    let jar = add_session_cookies(jar, &session, &state);
    Ok((jar, Json(response)))
}

#[derive(Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// The auth provider enforces the same minimum, but rejecting here
    /// gives the form a proper validation error instead of a 502.
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SignUpResponse {
    /// Email confirmation is disabled upstream; the session starts now.
    Active { user: User, expires_in: i64 },
    /// The provider sent a confirmation email; no session yet.
    ConfirmationSent,
}

/// Create an account with the auth provider.
async fn sign_up(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<SignUpRequest>,
) -> Result<(CookieJar, Json<SignUpResponse>)> {
    req.validate()?;

    match state
        .auth
        .sign_up(&req.email, &req.password, &req.name)
        .await?
    {
        SignupOutcome::Active(session) => {
            tracing::info!(user_id = %session.user.id, "User signed up, session started");
            let response = session_response(&session);
            let jar = add_session_cookies(jar, &session, &state);
            Ok((
                jar,
                Json(SignUpResponse::Active {
                    user: response.user,
                    expires_in: response.expires_in,
                }),
            ))
        }
        SignupOutcome::ConfirmationSent => Ok((jar, Json(SignUpResponse::ConfirmationSent))),
    }
}

#[derive(Serialize)]
pub struct SignOutResponse {
    pub success: bool,
}

/// End the session: revoke the token upstream and clear the cookies.
async fn sign_out(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<SignOutResponse>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        // Best effort: the cookies are cleared even if the provider call fails.
        if let Err(e) = state.auth.sign_out(cookie.value()).await {
            tracing::warn!(error = %e, "Provider sign-out failed");
        }
    }

    (
        clear_session_cookies(jar),
        Json(SignOutResponse { success: true }),
    )
}

// ─── Google OAuth (PKCE) ─────────────────────────────────────

#[derive(Deserialize)]
pub struct GoogleStartParams {
    /// Frontend URL to land on after the OAuth round trip.
    /// If not provided, uses the configured frontend URL.
    #[serde(default)]
    redirect_to: Option<String>,
}

/// Start the Google OAuth flow - redirect to the provider.
async fn google_start(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<GoogleStartParams>,
) -> Result<(CookieJar, Redirect)> {
    let redirect_to = params
        .redirect_to
        .unwrap_or_else(|| state.config.frontend_url.clone());

    let oauth_state = sign_state(&redirect_to, now_millis()?, &state.config.state_signing_key)?;

    // The PKCE verifier stays in a short-lived cookie on our side; only
    // its S256 challenge goes to the provider.
    let verifier = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let challenge = pkce_challenge(&verifier);

    let verifier_cookie = Cookie::build((VERIFIER_COOKIE, verifier))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cookies_secure(&state))
        .max_age(time::Duration::minutes(VERIFIER_TTL_MINUTES))
        .build();

    let callback_url = format!("{}/auth/callback", state.config.api_base_url);
    let auth_url = state
        .auth
        .authorize_url(&callback_url, &oauth_state, &challenge);

    tracing::info!(redirect_to = %redirect_to, "Starting Google OAuth flow");

    Ok((jar.add(verifier_cookie), Redirect::temporary(&auth_url)))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    state: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// OAuth callback - exchange the code for a session, set cookies.
async fn google_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    // Decode and verify the frontend URL from the state parameter
    let redirect_to = verify_state(&params.state, &state.config.state_signing_key, now_millis()?)
        .unwrap_or_else(|| {
            tracing::warn!(
                "Invalid or expired OAuth state parameter, falling back to default frontend URL"
            );
            state.config.frontend_url.clone()
        });

    // Check for OAuth errors from the provider
    if let Some(error) = params.error {
        tracing::warn!(error = %error, description = ?params.error_description, "OAuth error from provider");
        let target = format!("{}?error={}", redirect_to, urlencoding::encode(&error));
        return Ok((clear_verifier(jar), Redirect::temporary(&target)));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    let verifier = jar
        .get(VERIFIER_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::BadRequest("Missing PKCE verifier cookie".to_string()))?;

    let session = state.auth.exchange_pkce(&code, &verifier).await?;

    tracing::info!(user_id = %session.user.id, "Google OAuth sign-in complete");

    let jar = add_session_cookies(clear_verifier(jar), &session, &state);
    Ok((jar, Redirect::temporary(&redirect_to)))
}

// ─── Cookie Handling ─────────────────────────────────────────

/// Cookies are marked `Secure` when the API itself is served over HTTPS.
fn cookies_secure(state: &AppState) -> bool {
    state.config.api_base_url.starts_with("https://")
}

fn session_response(session: &ProviderSession) -> SessionResponse {
    SessionResponse {
        user: User {
            id: session.user.id,
            email: session.user.email.clone().unwrap_or_default(),
            name: session.user.user_metadata.name.clone(),
        },
        expires_in: session.expires_in,
    }
}

fn add_session_cookies(jar: CookieJar, session: &ProviderSession, state: &AppState) -> CookieJar {
    let max_age = time::Duration::seconds(session.expires_in);
    let secure = cookies_secure(state);

    let token = Cookie::build((SESSION_COOKIE, session.access_token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build();

    // Script-readable hint so the frontend can render signed-in chrome
    // without access to the token itself.
    let hint = Cookie::build((LOGGED_IN_COOKIE, "1"))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build();

    jar.add(token).add(hint)
}

fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
        .remove(Cookie::build(LOGGED_IN_COOKIE).path("/"))
}

fn clear_verifier(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(VERIFIER_COOKIE).path("/"))
}

// ─── OAuth State Signing ─────────────────────────────────────

fn now_millis() -> Result<u128> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis())
}

/// Compute the S256 code challenge for a PKCE verifier (RFC 7636).
fn pkce_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Sign a redirect URL plus timestamp into an opaque OAuth state value.
///
/// Format before base64: "redirect_to|timestamp_hex|signature_hex".
fn sign_state(redirect_to: &str, timestamp_ms: u128, secret: &[u8]) -> Result<String> {
    let payload = format!("{}|{:x}", redirect_to, timestamp_ms);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    let signed = format!("{}|{}", payload, hex::encode(signature));
    Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Verify signature and freshness, returning the embedded redirect URL.
fn verify_state(state: &str, secret: &[u8], now_ms: u128) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "redirect_to|timestamp_hex|signature_hex"
    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let redirect_to = parts[0];
    let timestamp_hex = parts[1];
    let signature_hex = parts[2];

    // Reconstruct payload and verify signature
    let payload = format!("{}|{}", redirect_to, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());

    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if signature_hex != expected_signature {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    let timestamp = u128::from_str_radix(timestamp_hex, 16).ok()?;
    if now_ms.saturating_sub(timestamp) > STATE_MAX_AGE_MS {
        tracing::warn!("OAuth state parameter expired");
        return None;
    }

    Some(redirect_to.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_state_key_32_bytes_minimum!";

    #[test]
    fn test_state_round_trip() {
        let now = 1_700_000_000_000u128;
        let signed = sign_state("https://example.com/app", now, SECRET).unwrap();

        let result = verify_state(&signed, SECRET, now + 1_000);
        assert_eq!(result, Some("https://example.com/app".to_string()));
    }

    #[test]
    fn test_state_rejects_tampered_payload() {
        let now = 1_700_000_000_000u128;
        let signed = sign_state("https://example.com/app", now, SECRET).unwrap();

        let decoded = URL_SAFE_NO_PAD.decode(&signed).unwrap();
        let tampered = String::from_utf8(decoded)
            .unwrap()
            .replace("example.com", "evil.example");
        let reencoded = URL_SAFE_NO_PAD.encode(tampered.as_bytes());

        assert_eq!(verify_state(&reencoded, SECRET, now), None);
    }

    #[test]
    fn test_state_rejects_wrong_key() {
        let now = 1_700_000_000_000u128;
        let signed = sign_state("https://example.com/app", now, SECRET).unwrap();

        let wrong_key = b"another_key_entirely............";
        assert_eq!(verify_state(&signed, wrong_key, now), None);
    }

    #[test]
    fn test_state_rejects_expired() {
        let now = 1_700_000_000_000u128;
        let signed = sign_state("https://example.com/app", now, SECRET).unwrap();

        let later = now + STATE_MAX_AGE_MS + 1;
        assert_eq!(verify_state(&signed, SECRET, later), None);
    }

    #[test]
    fn test_state_rejects_malformed_input() {
        assert_eq!(verify_state("not-base64!@#", SECRET, 0), None);

        let two_parts = URL_SAFE_NO_PAD.encode("only|two-parts");
        assert_eq!(verify_state(&two_parts, SECRET, 0), None);
    }

    #[test]
    fn test_pkce_challenge_matches_rfc_vector() {
        // RFC 7636 appendix B
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        assert_eq!(
            pkce_challenge(verifier),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }
}
