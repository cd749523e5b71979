use axum::http::StatusCode;
use thiserror::Error;

use crate::infrastructure::ffmpeg::probe::ProbeError;

/// Failures on the request path, each mapped to exactly one status code.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Only MP4 files are supported.")]
    UnsupportedMedia,

    #[error("Converted file '{0}' not found. Please ensure the original video has been converted.")]
    NotFound(String),

    #[error("Requested range not satisfiable")]
    RangeNotSatisfiable { size: u64 },

    #[error("Error reading file chunk")]
    Io(#[from] std::io::Error),

    #[error("{0} command not found")]
    ToolUnavailable(String),

    #[error("{tool} reported an error")]
    ToolFailed { tool: String, details: String },
}

impl MediaError {
    pub fn status(&self) -> StatusCode {
        match self {
            MediaError::UnsupportedMedia => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            MediaError::NotFound(_) => StatusCode::NOT_FOUND,
            MediaError::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            MediaError::Io(_) | MediaError::ToolUnavailable(_) | MediaError::ToolFailed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ProbeError> for MediaError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::Unavailable { tool } => MediaError::ToolUnavailable(tool),
            ProbeError::Failed { tool, details } => MediaError::ToolFailed { tool, details },
        }
    }
}
