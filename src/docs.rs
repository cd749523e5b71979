use utoipa::OpenApi;
use crate::common::response::ErrorBody;
use crate::modules::video::dto::VideoInfoResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::video::handler::stream_video,
        crate::modules::video::handler::video_info,
    ),
    components(
        schemas(VideoInfoResponse, ErrorBody)
    ),
    tags(
        (name = "Video", description = "Byte-range video delivery and metadata")
    )
)]
pub struct ApiDoc;
