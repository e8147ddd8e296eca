use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{auth::verify_token, error::AppError, state::AppState};

// ============================================================================
// Bearer Authentication Middleware
// ============================================================================

pub async fn bearer_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 1. Extract token from Authorization header
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Authentication("missing Authorization header".to_string()))?;

    let token = bearer_token(auth_header.to_str().ok()).ok_or_else(|| {
        AppError::Authentication("invalid Authorization header format".to_string())
    })?;

    // 2. Decode and validate JWT
    let claims = verify_token(&state.auth, token).map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        AppError::Authentication("invalid token".to_string())
    })?;

    // 3. Inject claims into request extensions
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Accepts exactly `Bearer <token>`, scheme case-insensitive.
fn bearer_token(header: Option<&str>) -> Option<&str> {
    let mut parts = header?.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}
