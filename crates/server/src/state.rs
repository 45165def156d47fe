use std::sync::Arc;

use services::services::{
    config::SneakerSearchConfig,
    image_search::{ImageSearchError, ImageSearchService},
    sneaker_info::SneakerInfoService,
};

/// Shared handles passed to every route.
#[derive(Clone)]
pub struct AppState {
    sneaker_info: Arc<SneakerInfoService>,
    images: Arc<ImageSearchService>,
}

impl AppState {
    pub fn new(sneaker_info: SneakerInfoService, images: ImageSearchService) -> Self {
        Self {
            sneaker_info: Arc::new(sneaker_info),
            images: Arc::new(images),
        }
    }

    pub fn from_config(config: SneakerSearchConfig) -> Result<Self, ImageSearchError> {
        Ok(Self::new(
            SneakerInfoService::from_config(config.gemini),
            ImageSearchService::new(config.image_search)?,
        ))
    }

    pub fn sneaker_info(&self) -> &SneakerInfoService {
        &self.sneaker_info
    }

    pub fn images(&self) -> &ImageSearchService {
        &self.images
    }
}
