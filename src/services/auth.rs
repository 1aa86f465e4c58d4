// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hosted auth provider client (Supabase GoTrue).
//!
//! Wraps the provider's session API: email/password sign-in and sign-up,
//! PKCE code exchange for the Google OAuth flow, and sign-out. Token
//! issuance, refresh and storage stay with the provider; this service only
//! relays sessions and classifies failures, keeping the provider's
//! "invalid credentials" case distinguishable so the frontend can suggest
//! signing up instead.

use crate::error::AppError;
use reqwest::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

/// Auth provider API client.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    auth_url: String,
    anon_key: String,
}

/// A session issued by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSession {
    /// Signed access token (JWT) to carry in the session cookie
    pub access_token: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
    /// The authenticated user
    pub user: ProviderUser,
}

/// Provider user record subset.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: ProviderUserMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderUserMetadata {
    pub name: Option<String>,
}

/// What a sign-up produced.
#[derive(Debug, Clone)]
pub enum SignupOutcome {
    /// Confirmation is disabled; the user is signed in immediately.
    Active(ProviderSession),
    /// A confirmation email was sent; no session yet.
    ConfirmationSent,
}

impl AuthClient {
    /// Create a new client for a Supabase project.
    pub fn new(supabase_url: &str, anon_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_url: format!("{}/auth/v1", supabase_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
        }
    }

    /// Email/password sign-in.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderSession, AppError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.token_request("password", &body).await
    }

    /// Exchange a PKCE authorization code for a session (OAuth callback).
    pub async fn exchange_pkce(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<ProviderSession, AppError> {
        let body = serde_json::json!({ "auth_code": auth_code, "code_verifier": code_verifier });
        self.token_request("pkce", &body).await
    }

    /// Email/password sign-up with a display name.
    ///
    /// Whether a session comes back depends on the project's email
    /// confirmation setting; both shapes are normal outcomes.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<SignupOutcome, AppError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "data": { "name": name },
        });

        let response = self
            .http
            .post(format!("{}/signup", self.auth_url))
            .header("apikey", self.anon_key.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(format!("Signup request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::AuthProvider(format!("Signup response read failed: {}", e)))?;

        if !status.is_success() {
            return Err(classify_auth_error(status, &text));
        }

        match serde_json::from_str::<SignupResponse>(&text) {
            Ok(SignupResponse::Session(session)) => Ok(SignupOutcome::Active(session)),
            Ok(SignupResponse::Pending(user)) => {
                tracing::info!(user_id = %user.id, "Signup confirmation email sent");
                Ok(SignupOutcome::ConfirmationSent)
            }
            Err(e) => Err(AppError::AuthProvider(format!(
                "Signup response parse error: {}",
                e
            ))),
        }
    }

    /// Invalidate the provider-side session on sign-out.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(format!("{}/logout", self.auth_url))
            .header("apikey", self.anon_key.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(format!("Logout request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::AuthProvider(format!(
                "Logout returned HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Provider authorize URL for the Google OAuth redirect.
    pub fn authorize_url(&self, redirect_to: &str, state: &str, code_challenge: &str) -> String {
        format!(
            "{}/authorize?provider=google&redirect_to={}&state={}\
             &code_challenge={}&code_challenge_method=s256",
            self.auth_url,
            urlencoding::encode(redirect_to),
            urlencoding::encode(state),
            urlencoding::encode(code_challenge),
        )
    }

    /// POST to the token endpoint with the given grant type.
    async fn token_request(
        &self,
        grant_type: &str,
        body: &serde_json::Value,
    ) -> Result<ProviderSession, AppError> {
        let response = self
            .http
            .post(format!("{}/token", self.auth_url))
            .query(&[("grant_type", grant_type)])
            .header("apikey", self.anon_key.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_auth_error(status, &text));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::AuthProvider(format!("Session parse error: {}", e)))
    }
}

/// Map a provider error response to the app taxonomy.
///
/// Bad credentials become the distinguishable `InvalidCredentials`; every
/// other failure surfaces the provider's own message unmodified.
fn classify_auth_error(status: StatusCode, body: &str) -> AppError {
    let parsed: AuthErrorBody = serde_json::from_str(body).unwrap_or_default();

    let message = parsed
        .msg
        .or(parsed.message)
        .or(parsed.error_description)
        .or(parsed.error)
        .unwrap_or_else(|| format!("HTTP {}", status));

    let invalid_credentials = parsed.error_code.as_deref() == Some("invalid_credentials")
        || message.contains("Invalid login credentials");

    if invalid_credentials {
        AppError::InvalidCredentials
    } else {
        AppError::AuthProvider(message)
    }
}

/// Provider error body; field names vary across endpoints and versions.
#[derive(Debug, Default, Deserialize)]
struct AuthErrorBody {
    error_code: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Signup returns a full session or a bare pending-confirmation user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignupResponse {
    Session(ProviderSession),
    Pending(PendingUser),
}

#[derive(Debug, Deserialize)]
struct PendingUser {
    id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_by_error_code() {
        let err = classify_auth_error(
            StatusCode::BAD_REQUEST,
            r#"{"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#,
        );

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[test]
    fn test_invalid_credentials_by_message() {
        let err = classify_auth_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );

        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[test]
    fn test_other_errors_surface_provider_message() {
        let err = classify_auth_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"code":422,"msg":"Password should be at least 6 characters"}"#,
        );

        match err {
            AppError::AuthProvider(msg) => {
                assert_eq!(msg, "Password should be at least 6 characters")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_body_falls_back_to_status() {
        let err = classify_auth_error(StatusCode::BAD_GATEWAY, "<html>upstream</html>");

        match err {
            AppError::AuthProvider(msg) => assert_eq!(msg, "HTTP 502 Bad Gateway"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_signup_response_shapes() {
        let session: SignupResponse = serde_json::from_str(
            r#"{"access_token":"jwt","token_type":"bearer","expires_in":3600,
                "user":{"id":"7f0746d8-66eb-4289-8bc5-393f4a4269b3","email":"a@b.c"}}"#,
        )
        .unwrap();
        assert!(matches!(session, SignupResponse::Session(_)));

        let pending: SignupResponse = serde_json::from_str(
            r#"{"id":"7f0746d8-66eb-4289-8bc5-393f4a4269b3","email":"a@b.c",
                "confirmation_sent_at":"2026-08-23T10:00:00Z"}"#,
        )
        .unwrap();
        assert!(matches!(pending, SignupResponse::Pending(_)));
    }

    #[test]
    fn test_authorize_url_encodes_params() {
        let client = AuthClient::new("https://proj.supabase.co", "anon");

        let url = client.authorize_url("http://localhost:8080/auth/callback", "st/ate", "chal");

        assert!(url.starts_with("https://proj.supabase.co/auth/v1/authorize?provider=google"));
        assert!(url.contains("redirect_to=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fcallback"));
        assert!(url.contains("state=st%2Fate"));
        assert!(url.contains("code_challenge_method=s256"));
    }
}
