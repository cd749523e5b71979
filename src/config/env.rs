use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerHost,
    ServerPort,
    StorageRoot,
    SourceDir,
    OutputDir,
    CatalogPath,
    PosterBasePath,
    StaticDir,
    FfmpegPath,
    FfprobePath,
    InputExtensions,
    MaxBufferedRange,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerHost => "APP_HOST",
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::StorageRoot => "VIDEO_STORAGE_ROOT",
            EnvKey::SourceDir => "VIDEO_SOURCE_DIR",
            EnvKey::OutputDir => "VIDEO_OUTPUT_DIR",
            EnvKey::CatalogPath => "CATALOG_PATH",
            EnvKey::PosterBasePath => "POSTER_BASE_PATH",
            EnvKey::StaticDir => "STATIC_DIR",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::FfprobePath => "FFPROBE_PATH",
            EnvKey::InputExtensions => "VIDEO_INPUT_EXTENSIONS",
            EnvKey::MaxBufferedRange => "MAX_BUFFERED_RANGE",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
