use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::errors::{is_input_error, InputError};

pub const CODE_SUCCESS: i32 = 0;
pub const CODE_INVALID_INPUT: i32 = 4001;
pub const CODE_INTERNAL: i32 = 1001;

/// Standard `{code, message, data}` envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            code: CODE_SUCCESS,
            message: "success".to_string(),
            data: Some(data),
        })
    }
}

/// Handler error: input errors become 400/4001, everything else 500/1001.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl ApiError {
    pub fn input(message: impl Into<String>) -> Self {
        Self(InputError::new(message).into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = format!("{:#}", self.0);
        let (status, code) = if is_input_error(&self.0) {
            warn!("Rejected request: {}", message);
            (StatusCode::BAD_REQUEST, CODE_INVALID_INPUT)
        } else {
            error!("Request failed: {}", message);
            (StatusCode::INTERNAL_SERVER_ERROR, CODE_INTERNAL)
        };

        let body = ApiResponse::<()> {
            code,
            message,
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;
