//! Duration probe backed by `ffprobe`.
//!
//! A missing duration is never fatal to callers: the transcoder falls back to
//! running without a progress display, the HTTP layer maps the error to a 500.

use std::io;
use std::path::Path;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProbeError {
    /// The inspector binary could not be found on the command path.
    #[error("{tool} command not found")]
    Unavailable { tool: String },

    /// The inspector ran but exited non-zero or printed something unparsable.
    #[error("{tool} failed: {details}")]
    Failed { tool: String, details: String },
}

/// Returns the container duration of `media` in seconds.
pub async fn probe_duration(ffprobe: &Path, media: &Path) -> Result<f64, ProbeError> {
    let tool = tool_name(ffprobe);

    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
            "-i",
        ])
        .arg(media)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| spawn_error(&tool, e))?;

    if !output.status.success() {
        return Err(ProbeError::Failed {
            tool,
            details: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let duration = parse_duration(&stdout).ok_or_else(|| ProbeError::Failed {
        tool: tool.clone(),
        details: format!("unparsable duration output: '{}'", stdout.trim()),
    })?;

    debug!(media = %media.display(), duration, "Probed duration");
    Ok(duration)
}

/// Parses the plain-text seconds value printed by the inspector.
pub fn parse_duration(stdout: &str) -> Option<f64> {
    let value = stdout.lines().next()?.trim().parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

pub(crate) fn tool_name(program: &Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| program.to_string_lossy().to_string())
}

fn spawn_error(tool: &str, err: io::Error) -> ProbeError {
    if err.kind() == io::ErrorKind::NotFound {
        ProbeError::Unavailable {
            tool: tool.to_string(),
        }
    } else {
        ProbeError::Failed {
            tool: tool.to_string(),
            details: format!("failed to spawn: {}", err),
        }
    }
}
