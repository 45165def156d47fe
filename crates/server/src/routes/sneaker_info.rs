use axum::{Json, Router, extract::State, response::Json as ResponseJson, routing::post};
use axum_extra::extract::WithRejection;
use services::services::sneaker_info::SearchResult;
use utils::response::ApiResponse;

use super::SearchRequest;
use crate::{AppState, error::ApiError};

/// POST /api/sneaker-info
/// Parsed sections for a search term, or `{ "error": ... }` for a designed error state
pub async fn sneaker_info(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<SearchRequest>, ApiError>,
) -> Result<ResponseJson<ApiResponse<SearchResult>>, ApiError> {
    let term = payload.term()?;
    let result = state.sneaker_info().search(term).await?;
    Ok(ResponseJson(ApiResponse::success(result)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/sneaker-info", post(sneaker_info))
}
