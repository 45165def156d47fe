use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{image_search::ImageSearchError, sneaker_info::SneakerInfoError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),
    #[error(transparent)]
    SneakerInfo(#[from] SneakerInfoError),
    #[error(transparent)]
    ImageSearch(#[from] ImageSearchError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(rejection) => rejection.status(),
            ApiError::BadRequest(_)
            | ApiError::SneakerInfo(SneakerInfoError::EmptyTerm)
            | ApiError::ImageSearch(ImageSearchError::EmptyQuery) => StatusCode::BAD_REQUEST,
            ApiError::ImageSearch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Error processing request".to_string()
        } else {
            self.to_string()
        };

        let body = Json(serde_json::json!({
            "message": message,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
