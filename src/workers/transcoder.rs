use std::io;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::settings::ToolPaths;
use crate::infrastructure::ffmpeg::encoder::{run_encoder, EncoderError};
use crate::infrastructure::ffmpeg::probe::probe_duration;
use crate::workers::progress::{ProgressChannel, ProgressMonitor, ProgressState};
use crate::workers::scanner::ConversionJob;

/// How long the monitor gets to finish draining once the encoder has exited.
pub const MONITOR_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("{tool} command not found")]
    EncoderUnavailable { tool: String },

    #[error("{tool} failed with exit code {code:?}")]
    EncoderFailed {
        tool: String,
        code: Option<i32>,
        details: String,
    },

    #[error("I/O error during conversion: {0}")]
    Io(#[from] io::Error),
}

impl From<EncoderError> for TranscodeError {
    fn from(err: EncoderError) -> Self {
        match err {
            EncoderError::Unavailable { tool } => TranscodeError::EncoderUnavailable { tool },
            EncoderError::Failed { tool, code, details } => {
                TranscodeError::EncoderFailed { tool, code, details }
            }
            EncoderError::Spawn { source, .. } => TranscodeError::Io(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeReport {
    pub duration: Option<f64>,
    /// Final monitor state; `None` when progress reporting was disabled or the
    /// monitor did not stop in time.
    pub progress: Option<ProgressState>,
}

/// Removes the destination on drop unless the encode was committed.
struct PartialOutput<'a> {
    path: &'a Path,
    committed: bool,
}

impl<'a> PartialOutput<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PartialOutput<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match std::fs::remove_file(self.path) {
            Ok(()) => info!(path = %self.path.display(), "Removed partial output"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => error!(path = %self.path.display(), "Could not remove partial output: {}", e),
        }
    }
}

pub struct Transcoder {
    tools: ToolPaths,
    show_progress: bool,
}

impl Transcoder {
    pub fn new(tools: ToolPaths) -> Self {
        Self {
            tools,
            show_progress: true,
        }
    }

    /// Keeps the progress bar off the terminal; progress is still tracked.
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Produces `job.destination` in the target format, or guarantees it does
    /// not exist when this returns an error.
    pub async fn transcode(&self, job: &ConversionJob) -> Result<TranscodeReport, TranscodeError> {
        info!("Converting '{}'...", job.display_name);

        let duration = match probe_duration(&self.tools.ffprobe, &job.source).await {
            Ok(duration) => {
                info!("Duration: {:.2} seconds", duration);
                Some(duration)
            }
            Err(e) => {
                warn!(
                    "Could not get duration for '{}': {}. Conversion will proceed without a progress bar.",
                    job.display_name, e
                );
                None
            }
        };

        let channel = match duration {
            Some(_) => match ProgressChannel::create() {
                Ok(channel) => Some(channel),
                Err(e) => {
                    warn!("Could not create progress channel: {}. Conversion will proceed without a progress bar.", e);
                    None
                }
            },
            None => None,
        };

        let cancel = CancellationToken::new();
        // Cancels the monitor even if this future is dropped mid-encode.
        let stop_monitor = cancel.clone().drop_guard();

        let monitor = match (&channel, duration) {
            (Some(channel), Some(duration)) => Some(
                ProgressMonitor::new(duration, self.progress_output())
                    .spawn(channel.path().to_path_buf(), cancel.clone()),
            ),
            _ => None,
        };

        let output = PartialOutput::new(&job.destination);
        let result = run_encoder(
            &self.tools.ffmpeg,
            &job.source,
            &job.destination,
            channel.as_ref().map(|c| c.path()),
        )
        .await;

        drop(stop_monitor);
        let progress = match monitor {
            Some(handle) => join_monitor(handle, MONITOR_JOIN_TIMEOUT).await,
            None => None,
        };
        if let Some(channel) = channel {
            channel.release();
        }

        result?;
        output.commit();

        if progress.is_none() {
            info!("Successfully converted '{}'.", job.display_name);
        }
        Ok(TranscodeReport { duration, progress })
    }

    fn progress_output(&self) -> Box<dyn io::Write + Send> {
        if self.show_progress {
            Box::new(io::stdout())
        } else {
            Box::new(io::sink())
        }
    }
}

/// Waits up to `limit` for the monitor; a monitor that overruns is aborted.
async fn join_monitor(mut handle: JoinHandle<ProgressState>, limit: Duration) -> Option<ProgressState> {
    match tokio::time::timeout(limit, &mut handle).await {
        Ok(Ok(state)) => {
            debug!(last = ?state.last_percentage, "Progress monitor stopped");
            Some(state)
        }
        Ok(Err(e)) => {
            warn!("Progress monitor task failed: {}", e);
            None
        }
        Err(_) => {
            warn!("Progress monitor did not stop within {:?}", limit);
            handle.abort();
            None
        }
    }
}
