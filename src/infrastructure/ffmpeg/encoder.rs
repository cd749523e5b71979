//! Encoder invocation with the fixed target-format profile.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use super::probe::tool_name;

#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("{tool} command not found")]
    Unavailable { tool: String },

    #[error("{tool} exited with status {code:?}: {details}")]
    Failed {
        tool: String,
        code: Option<i32>,
        details: String,
    },

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },
}

/// Argument profile: H.264 + AAC, 4:2:0 pixels, fast-start MP4, overwrite,
/// errors-only logging, and optional progress markers written to `progress`.
pub fn encoder_args(input: &Path, output: &Path, progress: Option<&Path>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-i".into(), input.into()];
    args.extend(
        [
            "-c:v", "libx264",
            "-c:a", "aac",
            "-vf", "format=yuv420p",
            "-movflags", "+faststart",
            "-y",
            "-loglevel", "error",
        ]
        .map(OsString::from),
    );

    if let Some(progress) = progress {
        args.push("-progress".into());
        args.push(progress.into());
    }

    args.push(output.into());
    args
}

/// Runs the encoder to completion. Stderr is captured so a failure can be
/// reported with the encoder's own diagnostics.
pub async fn run_encoder(
    ffmpeg: &Path,
    input: &Path,
    output: &Path,
    progress: Option<&Path>,
) -> Result<(), EncoderError> {
    let tool = tool_name(ffmpeg);
    let args = encoder_args(input, output, progress);
    debug!(?args, "Launching {}", tool);

    let child = Command::new(ffmpeg)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                EncoderError::Unavailable { tool: tool.clone() }
            } else {
                EncoderError::Spawn {
                    tool: tool.clone(),
                    source,
                }
            }
        })?;

    let result = child
        .wait_with_output()
        .await
        .map_err(|source| EncoderError::Spawn {
            tool: tool.clone(),
            source,
        })?;

    if result.status.success() {
        Ok(())
    } else {
        Err(EncoderError::Failed {
            tool,
            code: result.status.code(),
            details: String::from_utf8_lossy(&result.stderr).trim().to_string(),
        })
    }
}
