use axum::{Json, Router, extract::State, response::Json as ResponseJson, routing::post};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use services::services::image_search::{ImageSource, SneakerImage};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: String,
    pub source: ImageSource,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<SneakerImage> for ImageResponse {
    fn from(image: SneakerImage) -> Self {
        let message = (image.source == ImageSource::Placeholder)
            .then(|| "Using placeholder image as fallback".to_string());
        Self {
            image_url: image.image_url,
            source: image.source,
            success: true,
            message,
        }
    }
}

/// POST /api/sneaker-image
pub async fn sneaker_image(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<ImageRequest>, ApiError>,
) -> Result<ResponseJson<ImageResponse>, ApiError> {
    let query = payload
        .query
        .as_deref()
        .map(str::trim)
        .filter(|query| !query.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Search query is required".to_string()))?;

    let image = state.images().find_image(query).await?;
    Ok(ResponseJson(image.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/sneaker-image", post(sneaker_image))
}
