use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use serde::Serialize;
use utils::response::ApiResponse;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub version: &'static str,
    pub model_configured: bool,
    pub image_search_configured: bool,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> ResponseJson<ApiResponse<HealthStatus>> {
    ResponseJson(ApiResponse::success(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        model_configured: state.sneaker_info().has_model(),
        image_search_configured: state.images().is_configured(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
