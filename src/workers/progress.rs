//! Progress channel and monitor for a single conversion job.
//!
//! The encoder appends `key=value` status lines to the channel while the
//! monitor tails it from a separate task. Only elapsed-time markers are
//! interpreted; everything else is skipped so newer marker types are harmless.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub const POLL_INTERVAL: Duration = Duration::from_millis(50);
pub const BAR_WIDTH: usize = 50;

const MARKER_PREFIX: &str = "out_time_ms=";
const MIN_RENDER_STEP: f64 = 0.1;

/// Transient append target handed to the encoder. The backing file is
/// removed when the channel is released or dropped.
#[derive(Debug)]
pub struct ProgressChannel {
    path: TempPath,
}

impl ProgressChannel {
    pub fn create() -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("vidshelf-")
            .suffix(".progress")
            .tempfile()?;
        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn release(self) {
        let path = self.path.to_path_buf();
        match self.path.close() {
            Ok(()) => debug!(path = %path.display(), "Released progress channel"),
            Err(e) => warn!(path = %path.display(), "Could not delete progress channel: {}", e),
        }
    }
}

/// Per-job progress bookkeeping, owned by the monitor task.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    pub total_duration: Option<f64>,
    pub last_percentage: Option<f64>,
    pub bar_width: usize,
    /// Every percentage that was actually drawn, in order.
    pub rendered: Vec<f64>,
}

impl ProgressState {
    pub fn new(total_duration: Option<f64>) -> Self {
        Self {
            total_duration,
            last_percentage: None,
            bar_width: BAR_WIDTH,
            rendered: Vec::new(),
        }
    }

    /// Records an elapsed-time observation and returns the percentage to draw,
    /// if it advanced by at least one step or just reached 100.
    pub fn observe(&mut self, elapsed_secs: f64) -> Option<f64> {
        let total = self.total_duration.filter(|d| *d > 0.0)?;
        let pct = percentage(elapsed_secs, total);

        let advanced = match self.last_percentage {
            None => true,
            Some(last) => pct - last >= MIN_RENDER_STEP || (pct >= 100.0 && last < 100.0),
        };
        if !advanced {
            return None;
        }

        self.last_percentage = Some(pct);
        self.rendered.push(pct);
        Some(pct)
    }
}

pub fn percentage(elapsed_secs: f64, total_secs: f64) -> f64 {
    (elapsed_secs / total_secs * 100.0).clamp(0.0, 100.0)
}

/// Elapsed seconds carried by a marker line, or `None` for any other line.
pub fn parse_marker(line: &str) -> Option<f64> {
    let millis = line.trim().strip_prefix(MARKER_PREFIX)?.trim().parse::<i64>().ok()?;
    Some(millis as f64 / 1000.0)
}

pub fn render_bar(pct: f64, width: usize) -> String {
    let filled = ((width as f64) * pct / 100.0) as usize;
    let filled = filled.min(width);
    format!(
        "\rProgress: [{}{}] {:.1}% ",
        "█".repeat(filled),
        "-".repeat(width - filled),
        pct
    )
}

pub struct ProgressMonitor {
    state: ProgressState,
    out: Box<dyn Write + Send>,
}

impl ProgressMonitor {
    pub fn new(total_duration: f64, out: Box<dyn Write + Send>) -> Self {
        Self {
            state: ProgressState::new(Some(total_duration)),
            out,
        }
    }

    pub fn spawn(self, channel: PathBuf, cancel: CancellationToken) -> JoinHandle<ProgressState> {
        tokio::spawn(self.run(channel, cancel))
    }

    /// Tails `channel` until `cancel` fires, then drains whatever the encoder
    /// wrote after the last poll.
    pub async fn run(mut self, channel: PathBuf, cancel: CancellationToken) -> ProgressState {
        let file = match File::open(&channel).await {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %channel.display(), "Progress channel unavailable: {}", e);
                return self.state;
            }
        };
        let mut reader = BufReader::new(file);
        let mut line = Vec::new();

        loop {
            match reader.read_until(b'\n', &mut line).await {
                Ok(_) if line.ends_with(b"\n") => {
                    self.handle_line(&line);
                    line.clear();
                }
                Ok(_) => {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(POLL_INTERVAL) => {}
                    }
                }
                Err(e) => {
                    warn!("Progress channel read failed: {}", e);
                    break;
                }
            }
        }

        loop {
            match reader.read_until(b'\n', &mut line).await {
                Ok(0) | Err(_) => break,
                Ok(_) if line.ends_with(b"\n") => {
                    self.handle_line(&line);
                    line.clear();
                }
                Ok(_) => {}
            }
        }
        if !line.is_empty() {
            self.handle_line(&line);
        }

        let _ = self.out.write_all(b"\n");
        let _ = self.out.flush();
        self.state
    }

    fn handle_line(&mut self, raw: &[u8]) {
        let line = String::from_utf8_lossy(raw);
        let Some(elapsed) = parse_marker(&line) else {
            return;
        };
        if let Some(pct) = self.state.observe(elapsed) {
            let _ = self.out.write_all(render_bar(pct, self.state.bar_width).as_bytes());
            let _ = self.out.flush();
        }
    }
}
