use axum::Router;
use axum::routing::get;
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod model;
pub mod range;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::health))
        .route("/video/{filename}", get(handler::stream_video))
        .route("/video_info/{filename}", get(handler::video_info))
}
