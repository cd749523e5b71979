//! HTTP-level tests for byte-range delivery and the metadata endpoint.

mod common;

use axum::http::StatusCode;
use common::{header, sample_bytes, TestLibrary};

#[tokio::test]
async fn root_reports_liveness() {
    let lib = TestLibrary::new();
    let (status, _, body) = lib.get("/", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"Application is running");
}

#[tokio::test]
async fn full_request_returns_whole_file() {
    let lib = TestLibrary::new();
    let data = sample_bytes(4096);
    lib.add_file("movie.mp4", &data);

    let (status, headers, body) = lib.get("/video/movie.mp4", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(header(&headers, "accept-ranges"), "bytes");
    assert_eq!(header(&headers, "content-type"), "video/mp4");
    assert_eq!(header(&headers, "content-length"), "4096");
    assert_eq!(&body[..], &data[..]);
}

#[tokio::test]
async fn range_requests_return_exact_slices() {
    let lib = TestLibrary::new();
    let size = 10_000usize;
    let data = sample_bytes(size);
    lib.add_file("movie.mp4", &data);

    let spans = [(0, 0), (0, 99), (1, 1), (500, 4999), (9_000, 9_999), (9_999, 9_999), (0, 9_999)];
    for (start, end) in spans {
        let range = format!("bytes={start}-{end}");
        let (status, headers, body) = lib.get("/video/movie.mp4", &[("range", &range)]).await;

        assert_eq!(status, StatusCode::PARTIAL_CONTENT, "{range}");
        assert_eq!(header(&headers, "content-range"), format!("bytes {start}-{end}/{size}"));
        assert_eq!(header(&headers, "content-length"), (end - start + 1).to_string());
        assert_eq!(header(&headers, "content-type"), "video/mp4");
        assert_eq!(header(&headers, "accept-ranges"), "bytes");
        assert_eq!(&body[..], &data[start..=end], "{range}");
    }
}

#[tokio::test]
async fn open_ended_range_runs_to_end_of_file() {
    let lib = TestLibrary::new();
    let data = sample_bytes(1000);
    lib.add_file("movie.mp4", &data);

    let (status, headers, body) = lib.get("/video/movie.mp4", &[("range", "bytes=750-")]).await;
    assert_eq!(status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(header(&headers, "content-range"), "bytes 750-999/1000");
    assert_eq!(&body[..], &data[750..]);
}

#[tokio::test]
async fn large_ranges_are_streamed_intact() {
    let lib = TestLibrary::with_config(|config| config.max_buffered_range = 1024);
    let data = sample_bytes(300_000);
    lib.add_file("movie.mp4", &data);

    let (status, headers, body) = lib.get("/video/movie.mp4", &[("range", "bytes=100-250099")]).await;
    assert_eq!(status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(header(&headers, "content-length"), "250000");
    assert_eq!(&body[..], &data[100..250_100]);
}

#[tokio::test]
async fn non_target_extension_is_unsupported_whether_or_not_it_exists() {
    let lib = TestLibrary::new();
    lib.add_file("movie.mkv", b"matroska");

    for uri in ["/video/movie.mkv", "/video/absent.mkv", "/video/notes.txt"] {
        let (status, _, _) = lib.get(uri, &[]).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE, "{uri}");
    }
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let lib = TestLibrary::new();
    let (status, _, body) = lib.get("/video/absent.mp4", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(String::from_utf8_lossy(&body).contains("absent.mp4"));
}

#[tokio::test]
async fn traversal_outside_storage_root_is_not_found() {
    let outer = tempfile::tempdir().unwrap();
    let lib = TestLibrary::with_config(|config| config.storage_root = outer.path().join("library"));
    std::fs::create_dir(&lib.config.storage_root).unwrap();
    std::fs::write(outer.path().join("secret.mp4"), b"secret").unwrap();

    let (status, _, _) = lib.get("/video/..%2Fsecret.mp4", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsatisfiable_ranges_are_rejected() {
    let lib = TestLibrary::new();
    lib.add_file("movie.mp4", &sample_bytes(1000));

    for range in ["bytes=1000-", "bytes=600-500", "bytes=abc-", "lines=0-10"] {
        let (status, headers, body) = lib.get("/video/movie.mp4", &[("range", range)]).await;
        assert_eq!(status, StatusCode::RANGE_NOT_SATISFIABLE, "{range}");
        assert_eq!(header(&headers, "content-range"), "bytes */1000");
        assert!(!body.is_empty());
    }
}

#[tokio::test]
async fn range_end_past_file_is_clamped() {
    let lib = TestLibrary::new();
    let data = sample_bytes(1000);
    lib.add_file("movie.mp4", &data);

    let (status, headers, body) = lib.get("/video/movie.mp4", &[("range", "bytes=900-5000")]).await;
    assert_eq!(status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(header(&headers, "content-range"), "bytes 900-999/1000");
    assert_eq!(&body[..], &data[900..]);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let lib = TestLibrary::new();
    lib.add_file("movie.mp4", b"data");

    let (_, headers, _) = lib
        .get("/video/movie.mp4", &[("origin", "http://player.example")])
        .await;
    assert_eq!(header(&headers, "access-control-allow-origin"), "*");
}

#[tokio::test]
async fn video_info_validates_like_streaming() {
    let lib = TestLibrary::new();

    let (status, _, body) = lib.get("/video_info/movie.avi", &[]).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].is_string());

    let (status, _, body) = lib.get("/video_info/absent.mp4", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("absent.mp4"));
}

#[tokio::test]
async fn video_info_without_probe_tool() {
    let lib = TestLibrary::with_config(|config| config.tools.ffprobe = "/nonexistent/bin/ffprobe".into());
    lib.add_file("movie.mp4", b"data");

    let (status, _, body) = lib.get("/video_info/movie.mp4", &[]).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "ffprobe command not found");
    assert!(json.get("details").is_none());
}

#[cfg(unix)]
mod with_probe {
    use super::*;
    use common::write_script;

    #[tokio::test]
    async fn reports_probed_duration() {
        let tools = tempfile::tempdir().unwrap();
        let ffprobe = write_script(tools.path(), "ffprobe", "echo 125.4");
        let lib = TestLibrary::with_config(|config| config.tools.ffprobe = ffprobe);
        lib.add_file("movie.mp4", b"data");

        let (status, headers, body) = lib.get("/video_info/movie.mp4", &[]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(header(&headers, "content-type"), "application/json");
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "duration": 125.4 }));
    }

    #[tokio::test]
    async fn probe_errors_carry_details() {
        let tools = tempfile::tempdir().unwrap();
        let ffprobe = write_script(
            tools.path(),
            "ffprobe",
            "echo 'moov atom not found' >&2\nexit 1",
        );
        let lib = TestLibrary::with_config(|config| config.tools.ffprobe = ffprobe);
        lib.add_file("movie.mp4", b"data");

        let (status, _, body) = lib.get("/video_info/movie.mp4", &[]).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["details"], "moov atom not found");
        assert!(json["error"].is_string());
    }
}
