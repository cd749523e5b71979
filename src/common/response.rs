use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::error::MediaError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// JSON error rendered as `{"error": ..., "details"?: ...}`.
pub struct ApiError(pub ErrorBody, pub StatusCode);

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        let status = err.status();
        let details = match &err {
            MediaError::ToolFailed { details, .. } => Some(details.clone()),
            _ => None,
        };
        ApiError(
            ErrorBody {
                error: err.to_string(),
                details,
            },
            status,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (body, status) = (self.0, self.1);
        (status, Json(body)).into_response()
    }
}

/// Plain-text error used by the byte-serving endpoint.
pub struct TextError(pub MediaError);

impl From<MediaError> for TextError {
    fn from(err: MediaError) -> Self {
        TextError(err)
    }
}

impl IntoResponse for TextError {
    fn into_response(self) -> Response {
        let err = self.0;
        let mut response = (
            err.status(),
            [(header::CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.as_ref())],
            err.to_string(),
        )
            .into_response();

        if let MediaError::RangeNotSatisfiable { size } = err {
            if let Ok(value) = HeaderValue::from_str(&format!("bytes */{}", size)) {
                response.headers_mut().insert(header::CONTENT_RANGE, value);
            }
        }

        response
    }
}
