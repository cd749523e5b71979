use std::io::{self, SeekFrom};
use std::path::{Component, Path};

use axum::body::Body;
use bytes::Bytes;
use futures_util::future;
use futures_util::stream::{self, Stream, StreamExt};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::{error, warn};

use super::model::MediaAsset;
use super::range::RangeRequest;
use crate::common::error::MediaError;
use crate::common::media::has_target_extension;
use crate::config::settings::AppConfig;
use crate::infrastructure::ffmpeg::probe::probe_duration;

const STREAM_CHUNK: usize = 64 * 1024;

pub struct VideoService;

impl VideoService {
    /// Maps a request identifier to a regular file beneath `root`.
    ///
    /// The extension is checked before anything touches the filesystem, so a
    /// non-target name is rejected whether or not it exists.
    pub async fn resolve(root: &Path, filename: &str) -> Result<MediaAsset, MediaError> {
        if !has_target_extension(filename) {
            return Err(MediaError::UnsupportedMedia);
        }

        let not_found = || MediaError::NotFound(filename.to_string());
        if !is_plain_file_name(filename) {
            warn!(filename, "Rejected identifier outside the storage root");
            return Err(not_found());
        }

        let root = tokio::fs::canonicalize(root).await.map_err(|e| {
            error!(root = %root.display(), "Storage root unavailable: {}", e);
            not_found()
        })?;
        let path = tokio::fs::canonicalize(root.join(filename))
            .await
            .map_err(|_| not_found())?;
        if !path.starts_with(&root) {
            warn!(filename, "Resolved path escapes the storage root");
            return Err(not_found());
        }

        let metadata = tokio::fs::metadata(&path).await.map_err(|_| not_found())?;
        if !metadata.is_file() {
            return Err(not_found());
        }

        Ok(MediaAsset {
            filename: filename.to_string(),
            path,
            size: metadata.len(),
        })
    }

    /// Streams exactly `asset.size` bytes in fixed-size chunks.
    pub async fn open_full(asset: &MediaAsset) -> Result<Body, MediaError> {
        let file = File::open(&asset.path)
            .await
            .map_err(|e| read_failure(asset, e))?;
        let chunks = ReaderStream::with_capacity(file.take(asset.size), STREAM_CHUNK);
        Ok(Body::from_stream(exact_length(chunks, asset.size, &asset.filename)))
    }

    /// Seeks to `range.start` and yields exactly `range.len()` bytes.
    ///
    /// Spans up to `max_buffered` bytes are read completely before returning,
    /// so a read failure surfaces as an error instead of a short body. Larger
    /// spans read their first chunk eagerly and stream the remainder; if the
    /// file comes up short the stream ends in an error instead of a clean EOF.
    pub async fn read_range(
        asset: &MediaAsset,
        range: &RangeRequest,
        max_buffered: u64,
    ) -> Result<Body, MediaError> {
        let mut file = File::open(&asset.path)
            .await
            .map_err(|e| read_failure(asset, e))?;
        file.seek(SeekFrom::Start(range.start))
            .await
            .map_err(|e| read_failure(asset, e))?;

        let len = range.len();
        if len <= max_buffered {
            let mut buf = vec![0u8; len as usize];
            file.read_exact(&mut buf)
                .await
                .map_err(|e| read_failure(asset, e))?;
            return Ok(Body::from(Bytes::from(buf)));
        }

        let mut head = vec![0u8; STREAM_CHUNK.min(len as usize)];
        file.read_exact(&mut head)
            .await
            .map_err(|e| read_failure(asset, e))?;
        let rest = file.take(len - head.len() as u64);

        let chunks = stream::once(future::ready(Ok(Bytes::from(head))))
            .chain(ReaderStream::with_capacity(rest, STREAM_CHUNK));
        Ok(Body::from_stream(exact_length(chunks, len, &asset.filename)))
    }

    pub async fn duration(config: &AppConfig, filename: &str) -> Result<f64, MediaError> {
        let asset = Self::resolve(&config.storage_root, filename).await?;
        probe_duration(&config.tools.ffprobe, &asset.path)
            .await
            .map_err(|e| {
                error!(file = %asset.filename, "Could not get video info: {}", e);
                MediaError::from(e)
            })
    }
}

/// Passes `chunks` through and fails with `UnexpectedEof` if they end before
/// `expected` bytes, so a declared `Content-Length` is never silently cut short.
fn exact_length<S>(
    chunks: S,
    expected: u64,
    filename: &str,
) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static
where
    S: Stream<Item = io::Result<Bytes>> + Send + 'static,
{
    let filename = filename.to_string();
    chunks
        .map(Some)
        .chain(stream::once(future::ready(None)))
        .scan(expected, move |remaining, item| {
            let next = match item {
                Some(Ok(chunk)) => {
                    *remaining = remaining.saturating_sub(chunk.len() as u64);
                    Some(Ok(chunk))
                }
                Some(Err(e)) => {
                    error!(file = %filename, "Error reading file chunk: {}", e);
                    Some(Err(e))
                }
                None if *remaining > 0 => {
                    error!(file = %filename, missing = *remaining, "File ended before the promised length");
                    Some(Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("{} bytes missing", remaining),
                    )))
                }
                None => None,
            };
            future::ready(next)
        })
}

/// True when `name` is a single normal path component.
fn is_plain_file_name(name: &str) -> bool {
    if name.contains(['\\', '\0']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn read_failure(asset: &MediaAsset, err: io::Error) -> MediaError {
    error!(file = %asset.filename, "Error reading file chunk: {}", err);
    MediaError::Io(err)
}
