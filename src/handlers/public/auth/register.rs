// handlers/public/auth/register.rs - POST /auth/register handler

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use tracing::info;

use crate::database::models::RegisterInput;
use crate::error::ApiError;
use crate::middleware::JsonBody;
use crate::router::AppState;

/// POST /auth/register - Create an account with the default role and team
///
/// Input: `{ "name": "...", "email": "...", "password": "..." }`
///
/// Responds 201 `{ "message": "User registered successfully" }`. A taken
/// email is reported as 401 "user already exists".
pub async fn register_post(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RegisterInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    info!(email = %input.email, "Handling POST /auth/register");

    state.users.register(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}
