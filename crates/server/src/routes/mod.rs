use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
};
use serde::Deserialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{AppState, error::ApiError};

pub mod ai_search;
pub mod health;
pub mod sneaker_image;
pub mod sneaker_info;

/// `{ "code": "<search term>" }`
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub code: Option<String>,
}

impl SearchRequest {
    /// The trimmed term, or 400 when it is missing or blank.
    pub fn term(&self) -> Result<&str, ApiError> {
        self.code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Prompt is required".to_string()))
    }
}

pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .merge(sneaker_info::router())
        .merge(sneaker_image::router())
        .merge(health::router());

    Router::new()
        .merge(ai_search::router())
        .nest("/api", api)
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
}
