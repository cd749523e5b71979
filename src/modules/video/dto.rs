use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoInfoResponse {
    /// Container duration in seconds.
    pub duration: f64,
}
