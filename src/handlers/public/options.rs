// handlers/public/options.rs - GET /options/:kind handler

use axum::extract::State;
use serde_json::{json, Value};

use crate::database::models::OptionKind;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, PathParam};
use crate::router::AppState;

/// GET /options/:kind - Active rows of one lookup table
///
/// `kind` is one of `types`, `status`, `severity`, `products`, `areas`,
/// `performance-indicators`, `faulty-systems`, `causes`.
pub async fn options_get(
    State(state): State<AppState>,
    PathParam(kind): PathParam<String>,
) -> ApiResult<Value> {
    let kind: OptionKind = kind.parse().map_err(ApiError::not_found)?;

    let items = state.options.list(kind).await?;
    Ok(ApiResponse::success(
        format!("Fetched {}", kind.label()),
        json!({ kind.response_key(): items }),
    ))
}
