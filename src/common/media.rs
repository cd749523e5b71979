//! Target format shared by the serving path and the conversion pipeline.

use std::path::Path;

/// Extension (with leading dot) every served and converted file carries.
pub const TARGET_EXTENSION: &str = ".mp4";

/// MIME type sent with every video body.
pub const TARGET_MIME: &str = "video/mp4";

pub const DEFAULT_INPUT_EXTENSIONS: &[&str] = &[".mkv", ".webm", ".avi", ".mov"];

/// Case-insensitive check against [`TARGET_EXTENSION`].
pub fn has_target_extension(name: &str) -> bool {
    name.to_lowercase().ends_with(TARGET_EXTENSION)
}

/// Lowercased extension of `path` including the leading dot, or an empty string.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
