use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use walkdir::WalkDir;

use super::dto::CatalogEntry;
use crate::common::media::has_target_extension;

const POSTER_FILE: &str = "poster.jpg";

pub struct CatalogService;

impl CatalogService {
    /// Lists the servable files directly under `storage_root`, sorted by name.
    pub fn build(storage_root: &Path, poster_base_path: &str) -> Result<Vec<CatalogEntry>> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(storage_root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| format!("Failed to scan {}", storage_root.display()))?;
            let filename = entry.file_name().to_string_lossy().to_string();
            if !entry.file_type().is_file() || !has_target_extension(&filename) {
                continue;
            }

            entries.push(CatalogEntry {
                id: format!("video{}", entries.len() + 1),
                title: title_from_file_name(&filename),
                poster: format!("{}/{}", poster_base_path.trim_end_matches('/'), POSTER_FILE),
                filename,
            });
        }

        Ok(entries)
    }

    pub fn write(storage_root: &Path, poster_base_path: &str, output: &Path) -> Result<usize> {
        let entries = Self::build(storage_root, poster_base_path)?;
        let json = serde_json::to_string_pretty(&entries)?;
        std::fs::write(output, json)
            .with_context(|| format!("Failed to write catalog to {}", output.display()))?;

        info!("Wrote {} video(s) to {}", entries.len(), output.display());
        Ok(entries.len())
    }
}

/// `my_home-movie.mp4` becomes `My Home Movie`.
pub fn title_from_file_name(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    stem.replace(['_', '-'], " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
