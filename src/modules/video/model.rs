use std::path::PathBuf;

/// A file under the storage root, resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub filename: String,
    pub path: PathBuf,
    pub size: u64,
}
