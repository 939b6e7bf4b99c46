use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;
use crate::router::AppState;

pub const SESSION_COOKIE: &str = "jwt";

/// Authenticated user context extracted from the session token
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Validates the session token and injects `AuthUser` into request extensions
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&jar, &headers)
        .ok_or_else(|| ApiError::unauthorized("Missing or malformed JWT"))?;

    let claims = validate_jwt(&token, &state.session.jwt_secret).map_err(|e| {
        debug!(error = %e, "Rejected session token");
        ApiError::unauthorized("Invalid or expired JWT")
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// Cookie first, then `Authorization: Bearer`
fn extract_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
