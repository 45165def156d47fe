//! Product image lookup through Google Custom Search, with a placeholder fallback.
//!
//! Results are cached per service instance in a bounded cache keyed by the
//! normalized query.

use moka::future::Cache;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::config::ImageSearchConfig;

const CUSTOM_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";
const PLACEHOLDER_BASE: &str = "https://placehold.co/600x400/232323/FFFFFF";

#[derive(Debug, Clone, Error)]
pub enum ImageSearchError {
    #[error("search query is required")]
    EmptyQuery,
    #[error("network error: {0}")]
    Transport(String),
    #[error("http {status}")]
    Http { status: u16 },
    #[error("json error: {0}")]
    Serde(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    Google,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SneakerImage {
    pub image_url: String,
    pub source: ImageSource,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

struct Credentials {
    api_key: SecretString,
    engine_id: String,
}

pub struct ImageSearchService {
    http: Client,
    credentials: Option<Credentials>,
    endpoint: String,
    cache: Cache<String, SneakerImage>,
}

impl ImageSearchService {
    pub fn new(config: ImageSearchConfig) -> Result<Self, ImageSearchError> {
        let credentials = match (config.api_key, config.engine_id) {
            (Some(api_key), Some(engine_id)) => Some(Credentials { api_key, engine_id }),
            _ => None,
        };

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("sneaker-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ImageSearchError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            credentials,
            endpoint: CUSTOM_SEARCH_URL.to_string(),
            cache: Cache::new(config.cache_capacity),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Image for a sneaker name. Search failures degrade to a placeholder.
    pub async fn find_image(&self, query: &str) -> Result<SneakerImage, ImageSearchError> {
        let display = query.trim();
        if display.is_empty() {
            return Err(ImageSearchError::EmptyQuery);
        }

        let key = cache_key(display);
        if let Some(hit) = self.cache.get(&key).await {
            debug!(query = %key, "image cache hit");
            return Ok(hit);
        }

        let Some(credentials) = &self.credentials else {
            return Ok(placeholder_image(display));
        };

        match self.search(credentials, display).await {
            Ok(Some(image_url)) => {
                let image = SneakerImage {
                    image_url,
                    source: ImageSource::Google,
                };
                self.cache.insert(key, image.clone()).await;
                Ok(image)
            }
            Ok(None) => {
                debug!(query = %key, "image search returned no items");
                Ok(placeholder_image(display))
            }
            Err(e) => {
                warn!(query = %key, error = %e, "image search failed, using placeholder");
                Ok(placeholder_image(display))
            }
        }
    }

    async fn search(
        &self,
        credentials: &Credentials,
        query: &str,
    ) -> Result<Option<String>, ImageSearchError> {
        let q = format!("{query} sneakers shoes");
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("key", credentials.api_key.expose_secret()),
                ("cx", credentials.engine_id.as_str()),
                ("q", q.as_str()),
                ("searchType", "image"),
                ("num", "1"),
                ("imgSize", "large"),
                ("safe", "active"),
            ])
            .send()
            .await
            .map_err(|e| ImageSearchError::Transport(e.to_string()))?;

        if !res.status().is_success() {
            return Err(ImageSearchError::Http {
                status: res.status().as_u16(),
            });
        }

        let body = res
            .json::<SearchResponse>()
            .await
            .map_err(|e| ImageSearchError::Serde(e.to_string()))?;
        Ok(body.items.into_iter().next().map(|item| item.link))
    }
}

fn cache_key(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn placeholder_image(query: &str) -> SneakerImage {
    let text: String = url::form_urlencoded::byte_serialize(query.trim().as_bytes()).collect();
    SneakerImage {
        image_url: format!("{PLACEHOLDER_BASE}?text={text}"),
        source: ImageSource::Placeholder,
    }
}
