//! Single-pass classification of a source tree into conversion work.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::common::media::{dotted_extension, TARGET_EXTENSION};

/// One source to destination transcode, consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    AlreadyTarget,
    Unsupported,
    AlreadyConverted,
    NeedsConversion,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SkipCounts {
    pub already_target: usize,
    pub unsupported: usize,
    pub already_converted: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.already_target + self.unsupported + self.already_converted
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub jobs: Vec<ConversionJob>,
    pub skipped: SkipCounts,
}

pub struct BatchScanner<'a> {
    output_dir: &'a Path,
    input_extensions: &'a [String],
}

impl<'a> BatchScanner<'a> {
    pub fn new(output_dir: &'a Path, input_extensions: &'a [String]) -> Self {
        Self {
            output_dir,
            input_extensions,
        }
    }

    /// Converted files are flattened into the output directory under the
    /// source's stem.
    pub fn destination_for(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        self.output_dir.join(format!("{}{}", stem, TARGET_EXTENSION))
    }

    pub fn classify(&self, source: &Path) -> Classification {
        let ext = dotted_extension(source);
        if ext == TARGET_EXTENSION {
            Classification::AlreadyTarget
        } else if !self.input_extensions.iter().any(|e| *e == ext) {
            Classification::Unsupported
        } else if self.destination_for(source).exists() {
            Classification::AlreadyConverted
        } else {
            Classification::NeedsConversion
        }
    }

    /// Walks `source_dir` in file-name order and returns the ordered work list.
    pub fn scan(&self, source_dir: &Path) -> ScanResult {
        let mut result = ScanResult::default();
        let mut planned: HashSet<PathBuf> = HashSet::new();

        let entries = WalkDir::new(source_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file());

        for entry in entries {
            let path = entry.path();
            match self.classify(path) {
                Classification::AlreadyTarget => result.skipped.already_target += 1,
                Classification::Unsupported => result.skipped.unsupported += 1,
                Classification::AlreadyConverted => result.skipped.already_converted += 1,
                Classification::NeedsConversion => {
                    let destination = self.destination_for(path);
                    if !planned.insert(destination.clone()) {
                        debug!(source = %path.display(), "Destination already claimed in this scan");
                        result.skipped.already_converted += 1;
                        continue;
                    }
                    result.jobs.push(ConversionJob {
                        source: path.to_path_buf(),
                        destination,
                        display_name: entry.file_name().to_string_lossy().to_string(),
                    });
                }
            }
        }

        result
    }
}
