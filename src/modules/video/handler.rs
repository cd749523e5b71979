use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::dto::VideoInfoResponse;
use super::range::RangeRequest;
use super::service::VideoService;
use crate::common::error::MediaError;
use crate::common::media::TARGET_MIME;
use crate::common::response::{ApiError, ErrorBody, TextError};
use crate::state::AppState;

/// Stream a converted video, honoring a single byte range
#[utoipa::path(
    get,
    path = "/video/{filename}",
    params(
        ("filename" = String, Path, description = "MP4 file name under the storage root"),
        ("Range" = Option<String>, Header, description = "Byte range, e.g. bytes=0-1023")
    ),
    responses(
        (status = 200, description = "Full Content", content_type = "video/mp4"),
        (status = 206, description = "Partial Content", content_type = "video/mp4"),
        (status = 404, description = "Not Found"),
        (status = 415, description = "Unsupported Media Type"),
        (status = 416, description = "Range Not Satisfiable"),
        (status = 500, description = "Error reading file chunk")
    ),
    tag = "Video"
)]
pub async fn stream_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<Response, TextError> {
    let asset = VideoService::resolve(&state.config.storage_root, &filename).await?;

    let Some(raw_range) = headers.get(header::RANGE) else {
        let body = VideoService::open_full(&asset).await?;
        return Ok(Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, TARGET_MIME)
            .header(header::CONTENT_LENGTH, asset.size)
            .header(header::ACCEPT_RANGES, "bytes")
            .body(body)
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()));
    };

    let range = raw_range
        .to_str()
        .ok()
        .and_then(|value| RangeRequest::parse(value, asset.size))
        .ok_or(MediaError::RangeNotSatisfiable { size: asset.size })?;

    let body = VideoService::read_range(&asset, &range, state.config.max_buffered_range).await?;

    Ok(Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, TARGET_MIME)
        .header(header::CONTENT_RANGE, range.content_range())
        .header(header::CONTENT_LENGTH, range.len())
        .header(header::ACCEPT_RANGES, "bytes")
        .body(body)
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()))
}

/// Get the duration of a converted video
#[utoipa::path(
    get,
    path = "/video_info/{filename}",
    params(
        ("filename" = String, Path, description = "MP4 file name under the storage root")
    ),
    responses(
        (status = 200, description = "Video duration", body = VideoInfoResponse),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 415, description = "Unsupported Media Type", body = ErrorBody),
        (status = 500, description = "Probe unavailable or failed", body = ErrorBody)
    ),
    tag = "Video"
)]
pub async fn video_info(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<VideoInfoResponse>, ApiError> {
    let duration = VideoService::duration(&state.config, &filename).await?;
    Ok(Json(VideoInfoResponse { duration }))
}

pub async fn health() -> &'static str {
    "Application is running"
}
