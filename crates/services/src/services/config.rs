//! Environment-driven settings for the sneaker search services.

use std::{str::FromStr, time::Duration};

use secrecy::SecretString;
use tracing::warn;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_IMAGE_CACHE_CAPACITY: u64 = 256;
pub const DEFAULT_IMAGE_SEARCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
pub struct GeminiConfig {
    /// `None` puts the pipeline in mock-only mode.
    pub api_key: Option<SecretString>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug)]
pub struct ImageSearchConfig {
    pub api_key: Option<SecretString>,
    pub engine_id: Option<String>,
    pub cache_capacity: u64,
    pub timeout: Duration,
}

#[derive(Debug)]
pub struct SneakerSearchConfig {
    pub gemini: GeminiConfig,
    pub image_search: ImageSearchConfig,
}

impl SneakerSearchConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            gemini: GeminiConfig {
                api_key: get("GOOGLE_GEMINI_KEY").map(SecretString::from),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: get("GEMINI_API_BASE")
                    .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
                timeout: Duration::from_secs(parse_or(
                    "GEMINI_TIMEOUT_SECS",
                    get("GEMINI_TIMEOUT_SECS"),
                    DEFAULT_GEMINI_TIMEOUT_SECS,
                )),
            },
            image_search: ImageSearchConfig {
                api_key: get("GOOGLE_CUSTOM_SEARCH_KEY").map(SecretString::from),
                engine_id: get("GOOGLE_CUSTOM_SEARCH_CX"),
                cache_capacity: parse_or(
                    "IMAGE_CACHE_CAPACITY",
                    get("IMAGE_CACHE_CAPACITY"),
                    DEFAULT_IMAGE_CACHE_CAPACITY,
                ),
                timeout: Duration::from_secs(parse_or(
                    "IMAGE_SEARCH_TIMEOUT_SECS",
                    get("IMAGE_SEARCH_TIMEOUT_SECS"),
                    DEFAULT_IMAGE_SEARCH_TIMEOUT_SECS,
                )),
            },
        }
    }
}

/// Parse `raw`, falling back to `default` with a warning when it is not a valid value.
pub fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default = %default, "invalid setting, using default");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> SneakerSearchConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SneakerSearchConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini.base_url, DEFAULT_GEMINI_API_BASE);
        assert_eq!(config.gemini.timeout, Duration::from_secs(30));
        assert!(config.image_search.api_key.is_none());
        assert_eq!(config.image_search.cache_capacity, DEFAULT_IMAGE_CACHE_CAPACITY);
        assert_eq!(config.image_search.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_values_are_read() {
        let config = config_from(&[
            ("GOOGLE_GEMINI_KEY", " abc123 "),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("GEMINI_TIMEOUT_SECS", "5"),
            ("GOOGLE_CUSTOM_SEARCH_CX", "engine"),
            ("IMAGE_CACHE_CAPACITY", "10"),
            ("IMAGE_SEARCH_TIMEOUT_SECS", "3"),
        ]);
        assert_eq!(
            config.gemini.api_key.as_ref().map(|k| k.expose_secret().to_string()),
            Some("abc123".to_string())
        );
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.gemini.timeout, Duration::from_secs(5));
        assert_eq!(config.image_search.engine_id.as_deref(), Some("engine"));
        assert_eq!(config.image_search.cache_capacity, 10);
        assert_eq!(config.image_search.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_blank_and_invalid_values_fall_back() {
        let config = config_from(&[
            ("GOOGLE_GEMINI_KEY", "   "),
            ("GEMINI_TIMEOUT_SECS", "soon"),
            ("IMAGE_CACHE_CAPACITY", "-1"),
        ]);
        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.gemini.timeout, Duration::from_secs(DEFAULT_GEMINI_TIMEOUT_SECS));
        assert_eq!(config.image_search.cache_capacity, DEFAULT_IMAGE_CACHE_CAPACITY);
    }
}
