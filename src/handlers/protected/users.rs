// handlers/protected/users.rs - GET /users handler

use axum::extract::State;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::router::AppState;

/// GET /users - Id, name and avatar of every user, for assignee pickers
pub async fn users_get(State(state): State<AppState>) -> ApiResult<Value> {
    let users = state.users.list_public().await?;
    Ok(ApiResponse::success("Fetched users", json!({ "users": users })))
}
