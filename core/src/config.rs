//! Client configuration.

use crate::error::ApiError;

/// Environment variable holding the backend origin.
pub const BASE_URL_ENV: &str = "BLOG_API_BASE_URL";

/// Where the backend listens during local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(ApiError::Config(format!("{BASE_URL_ENV} must not be empty")));
        }
        Ok(Self { base_url })
    }

    /// Read `BLOG_API_BASE_URL`, falling back to the development default.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        match lookup(BASE_URL_ENV) {
            Some(value) => Self::new(value),
            None => Ok(Self::default()),
        }
    }
}
