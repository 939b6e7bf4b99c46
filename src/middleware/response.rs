use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;

/// Success envelope: `{ "error": false, "msg": ..., "data": ... }`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub msg: String,
    pub data: T,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(msg: impl Into<String>, data: T) -> Self {
        Self::with_status(msg, data, StatusCode::OK)
    }

    pub fn with_status(msg: impl Into<String>, data: T, status_code: StatusCode) -> Self {
        Self {
            msg: msg.into(),
            data,
            status_code,
        }
    }

    pub fn created(msg: impl Into<String>, data: T) -> Self {
        Self::with_status(msg, data, StatusCode::CREATED)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return ApiError::internal_server_error().into_response();
            }
        };

        let envelope = json!({
            "error": false,
            "msg": self.msg,
            "data": data_value
        });

        (self.status_code, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
