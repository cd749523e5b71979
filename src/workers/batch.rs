//! Sequential batch pipeline: scan once, then convert one file at a time.

use tracing::{error, info};

use crate::config::settings::AppConfig;
use crate::workers::scanner::{BatchScanner, SkipCounts};
use crate::workers::transcoder::{TranscodeError, Transcoder};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub queued: usize,
    pub converted: usize,
    pub failed: usize,
    pub skipped: SkipCounts,
}

pub async fn run_batch(config: &AppConfig, transcoder: &Transcoder) -> BatchSummary {
    info!("Scanning {} for videos to convert...", config.source_dir.display());
    let scan = BatchScanner::new(&config.output_dir, &config.input_extensions).scan(&config.source_dir);

    let mut summary = BatchSummary {
        queued: scan.jobs.len(),
        skipped: scan.skipped.clone(),
        ..BatchSummary::default()
    };

    info!("Found {} video(s) needing conversion.", summary.queued);
    if summary.skipped.total() > 0 {
        info!(
            already_target = summary.skipped.already_target,
            unsupported = summary.skipped.unsupported,
            already_converted = summary.skipped.already_converted,
            "Skipped {} file(s)",
            summary.skipped.total()
        );
    }

    for (index, job) in scan.jobs.iter().enumerate() {
        info!(
            "--- Converting file {} of {}: '{}' ---",
            index + 1,
            summary.queued,
            job.display_name
        );

        match transcoder.transcode(job).await {
            Ok(_) => {
                info!("Finished converting '{}'.", job.display_name);
                summary.converted += 1;
            }
            Err(TranscodeError::EncoderFailed { details, code, .. }) => {
                error!(?code, "Failed to convert '{}': {}", job.display_name, details);
                summary.failed += 1;
            }
            Err(e) => {
                error!("Failed to convert '{}': {}", job.display_name, e);
                summary.failed += 1;
            }
        }
    }

    info!(
        processed = summary.queued,
        converted = summary.converted,
        failed = summary.failed,
        skipped = summary.skipped.total(),
        "Conversion process finished"
    );
    summary
}
