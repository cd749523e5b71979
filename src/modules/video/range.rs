//! Single-range `Range` header handling.
//!
//! Only the first range of a comma separated list is honored; multi-range
//! (multipart/byteranges) responses are not produced.

/// A satisfiable byte span of a resource: `0 <= start <= end <= size - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    pub start: u64,
    pub end: u64,
    pub size: u64,
}

impl RangeRequest {
    /// Parses `bytes=<start>-[<end>]` or the suffix form `bytes=-<len>` against
    /// a resource of `size` bytes. An end past the resource is clamped to the
    /// last byte. Returns `None` for malformed or unsatisfiable ranges.
    pub fn parse(header: &str, size: u64) -> Option<Self> {
        let (unit, spec) = header.trim().split_once('=')?;
        if !unit.trim().eq_ignore_ascii_case("bytes") {
            return None;
        }

        let first = spec.split(',').next()?.trim();
        let (start_str, end_str) = first.split_once('-')?;
        let (start_str, end_str) = (start_str.trim(), end_str.trim());

        if size == 0 {
            return None;
        }
        let last = size - 1;

        let (start, end) = if start_str.is_empty() {
            let suffix: u64 = end_str.parse().ok()?;
            if suffix == 0 {
                return None;
            }
            (size.saturating_sub(suffix), last)
        } else {
            let start: u64 = start_str.parse().ok()?;
            let end = if end_str.is_empty() {
                last
            } else {
                end_str.parse::<u64>().ok()?.min(last)
            };
            (start, end)
        };

        if start > end {
            return None;
        }

        Some(Self { start, end, size })
    }

    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.size)
    }
}
