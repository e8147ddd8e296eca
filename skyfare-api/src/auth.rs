use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::{AppState, AuthConfig}};

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub exp: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token lifetime of {0}s is out of range")]
    Lifetime(u64),
    #[error(transparent)]
    Encode(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/token", post(issue_token_handler))
}

/// Signs an HS256 token for `subject` that expires after the configured lifetime.
pub fn issue_token(auth: &AuthConfig, subject: &str) -> Result<String, TokenError> {
    let expires_at = i64::try_from(auth.expiration)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or(TokenError::Lifetime(auth.expiration))?;

    let claims = Claims {
        sub: subject.to_owned(),
        iss: auth.issuer.clone(),
        exp: expires_at.timestamp() as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )?)
}

/// Checks signature, expiry and issuer.
pub fn verify_token(auth: &AuthConfig, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[auth.issuer.as_str()]);

    decode::<Claims>(token, &DecodingKey::from_secret(auth.secret.as_bytes()), &validation)
        .map(|data| data.claims)
}

async fn issue_token_handler(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(request) =
        payload.map_err(|_| AppError::BadRequest("invalid request payload".to_string()))?;

    let username = request.username.trim();
    let password = request.password.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest("username and password are required".to_string()));
    }

    if username != state.auth.username || password != state.auth.password {
        tracing::warn!("Rejected token request for user {}", username);
        return Err(AppError::Authentication("invalid username or password".to_string()));
    }

    let token = issue_token(&state.auth, username)
        .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))?;

    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer",
        expires_in: state.auth.expiration,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthConfig {
        AuthConfig {
            secret: "unit-secret".into(),
            expiration: 3600,
            issuer: "skyfare".into(),
            username: "admin".into(),
            password: "secret".into(),
        }
    }

    #[test]
    fn test_issued_token_verifies() {
        let token = issue_token(&auth(), "admin").unwrap();
        let claims = verify_token(&auth(), &token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.iss, "skyfare");
    }

    #[test]
    fn test_oversized_lifetime_is_an_error() {
        for expiration in [u64::MAX, i64::MAX as u64] {
            let err = issue_token(&AuthConfig { expiration, ..auth() }, "admin").unwrap_err();
            assert!(matches!(err, TokenError::Lifetime(e) if e == expiration), "{err:?}");
        }
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token(&auth(), "admin").unwrap();
        let other = AuthConfig { secret: "another-secret".into(), ..auth() };
        assert!(verify_token(&other, &token).is_err());
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let token = issue_token(&AuthConfig { issuer: "someone-else".into(), ..auth() }, "admin").unwrap();
        assert!(verify_token(&auth(), &token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = Claims {
            sub: "admin".into(),
            iss: "skyfare".into(),
            exp: (Utc::now() - Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-secret"),
        )
        .unwrap();
        assert!(verify_token(&auth(), &token).is_err());
    }
}
