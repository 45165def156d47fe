use axum::{Json, Router, extract::State, routing::post};
use axum_extra::extract::WithRejection;

use super::SearchRequest;
use crate::{AppState, error::ApiError};

/// POST /AiSearch
/// Cleaned answer as plain text, or an `ERROR_*` token for the designed error states.
pub async fn ai_search(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<SearchRequest>, ApiError>,
) -> Result<String, ApiError> {
    let term = payload.term()?;
    Ok(state.sneaker_info().search_text(term).await?)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/AiSearch", post(ai_search))
}
