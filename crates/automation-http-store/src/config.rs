//! Connection settings for the automation API

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{HttpStoreError, Result};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api/v1";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpStoreConfig {
    /// API root, e.g. `http://host:8080/api/v1`
    pub base_url: String,
    /// Whole-request timeout; the designer has no timeout of its own
    pub timeout_secs: u64,
}

impl Default for HttpStoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HttpStoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// `{base}/automations`
    pub fn automations_url(&self) -> Result<Url> {
        self.url_with(&["automations"])
    }

    /// `{base}/automations/{id}`, with the id escaped as one path segment
    pub fn automation_url(&self, id: &str) -> Result<Url> {
        self.url_with(&["automations", id])
    }

    fn url_with(&self, segments: &[&str]) -> Result<Url> {
        let invalid = |reason: String| HttpStoreError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
