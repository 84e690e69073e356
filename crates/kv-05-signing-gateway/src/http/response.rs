//! Response envelopes and error rendering.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::error::GatewayError;

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

pub fn data<T: Serialize>(value: T) -> Json<Data<T>> {
    Json(Data { data: value })
}

/// Failure envelope: `{"errors": [...]}`.
#[derive(Debug, Serialize)]
pub struct Errors {
    pub errors: Vec<String>,
}

/// JSON body extractor whose rejection renders as a gateway error.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(GatewayError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::Validation(rejection.body_text())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), "[kv-05] Request failed: {}", message);
        } else {
            warn!(status = status.as_u16(), "[kv-05] Request refused: {}", message);
        }

        (status, Json(Errors { errors: vec![message] })).into_response()
    }
}
