use std::path::PathBuf;
use crate::config::env::{self, EnvKey};
use crate::common::media::DEFAULT_INPUT_EXTENSIONS;

const DEFAULT_MAX_BUFFERED_RANGE: u64 = 16 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub storage_root: PathBuf,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub poster_base_path: String,
    pub static_dir: PathBuf,
    pub tools: ToolPaths,
    pub input_extensions: Vec<String>,
    pub max_buffered_range: u64,
}

/// Locations of the external media tools. Bare names are resolved through `PATH`.
#[derive(Clone, Debug)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        let storage_root = PathBuf::from(env::get(EnvKey::StorageRoot)?);
        let output_dir = env::get(EnvKey::OutputDir)
            .map(PathBuf::from)
            .unwrap_or_else(|_| storage_root.clone());

        let default_extensions = DEFAULT_INPUT_EXTENSIONS.join(",");

        Ok(Self {
            server_host: env::get_or(EnvKey::ServerHost, "0.0.0.0"),
            server_port: env::get_parsed(EnvKey::ServerPort, 5000),
            storage_root,
            source_dir: PathBuf::from(env::get_or(EnvKey::SourceDir, "./videos/source")),
            output_dir,
            catalog_path: PathBuf::from(env::get_or(EnvKey::CatalogPath, "./videos.json")),
            poster_base_path: env::get_or(EnvKey::PosterBasePath, "/static/posters/"),
            static_dir: PathBuf::from(env::get_or(EnvKey::StaticDir, "./static")),
            tools: ToolPaths {
                ffmpeg: PathBuf::from(env::get_or(EnvKey::FfmpegPath, "ffmpeg")),
                ffprobe: PathBuf::from(env::get_or(EnvKey::FfprobePath, "ffprobe")),
            },
            input_extensions: parse_extensions(&env::get_or(EnvKey::InputExtensions, &default_extensions)),
            max_buffered_range: env::get_parsed(EnvKey::MaxBufferedRange, DEFAULT_MAX_BUFFERED_RANGE),
        })
    }

    /// Configuration rooted at `storage_root` with defaults for everything else.
    pub fn with_storage_root(storage_root: impl Into<PathBuf>) -> Self {
        let storage_root = storage_root.into();
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 5000,
            source_dir: PathBuf::from("./videos/source"),
            output_dir: storage_root.clone(),
            storage_root,
            catalog_path: PathBuf::from("./videos.json"),
            poster_base_path: "/static/posters/".to_string(),
            static_dir: PathBuf::from("./static"),
            tools: ToolPaths::default(),
            input_extensions: DEFAULT_INPUT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_buffered_range: DEFAULT_MAX_BUFFERED_RANGE,
        }
    }
}

/// Splits a comma separated extension list into normalized `.ext` entries.
fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{}", e))
        .collect()
}
