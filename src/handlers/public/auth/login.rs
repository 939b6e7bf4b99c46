// handlers/public/auth/login.rs - POST /auth/login handler

use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::{generate_jwt, Claims};
use crate::config::MAX_JWT_EXPIRY_HOURS;
use crate::database::models::{LoginInput, UserPublicData};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, JsonBody, SESSION_COOKIE};
use crate::router::AppState;
use crate::services::ServiceError;

/// POST /auth/login - Authenticate and receive a session token
///
/// The token is returned in the body and also set as the `jwt` cookie:
///
/// ```json
/// {
///   "error": false,
///   "msg": "Login successful",
///   "data": { "token": "eyJhbGciOiJIUzI1NiI...", "user": { "id": 1, "name": "Jane", "avatarUrl": null } }
/// }
/// ```
pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(input): JsonBody<LoginInput>,
) -> Result<(CookieJar, ApiResponse<Value>), ApiError> {
    let user = state.users.login(input).await?;

    let session = &state.session;
    let claims = Claims::new(&user, session.jwt_expiry_hours);
    let token = generate_jwt(&claims, &session.jwt_secret).map_err(ServiceError::from)?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::hours(
            session.jwt_expiry_hours.min(MAX_JWT_EXPIRY_HOURS) as i64,
        ))
        .same_site(SameSite::Lax)
        .secure(session.cookie_secure);

    info!(user_id = user.id, "User logged in");

    let data = json!({
        "token": token,
        "user": UserPublicData::from(&user),
    });
    Ok((jar.add(cookie), ApiResponse::success("Login successful", data)))
}
