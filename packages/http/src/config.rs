//! Backend configuration.
//!
//! Settings can be built in code or loaded from JSON:
//!
//! ```rust
//! use interoute_http::HttpBackendConfig;
//!
//! let config = HttpBackendConfig::from_json(r#"{
//!     "root_url": "http://localhost:8080/",
//!     "timeout_ms": 5000,
//!     "default_headers": {"X-Client": "interoute"}
//! }"#).unwrap();
//!
//! assert_eq!(config.timeout().as_secs(), 5);
//! assert!(config.error_on_status);
//! ```

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpBackendConfig {
    /// Prefix for destinations that are not absolute URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_url: Option<String>,

    /// Whole-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Headers sent with every request. Per-route headers win on conflict.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub default_headers: HashMap<String, String>,

    /// Raise non-2xx responses as transport failures that embed the response.
    #[serde(default = "default_true")]
    pub error_on_status: bool,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            root_url: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            default_headers: HashMap::new(),
            error_on_status: true,
        }
    }
}

impl HttpBackendConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_root_url(mut self, root_url: impl Into<String>) -> Self {
        self.root_url = Some(root_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_error_on_status(mut self, error_on_status: bool) -> Self {
        self.error_on_status = error_on_status;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check that the root URL, if set, is absolute.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(root) = &self.root_url {
            let url = Url::parse(root)?;
            if url.cannot_be_a_base() {
                return Err(Error::InvalidUrl {
                    message: format!("root URL cannot be a base: {}", root),
                });
            }
        }
        Ok(())
    }

    /// Combine the root URL with a resolved destination.
    ///
    /// Absolute destinations are returned unchanged. Relative ones are
    /// appended to the root, with exactly one `/` between them.
    pub fn resolve_url(&self, destination: &str) -> String {
        if destination.starts_with("http://") || destination.starts_with("https://") {
            return destination.to_string();
        }

        match &self.root_url {
            Some(root) => {
                let root = root.trim_end_matches('/');
                let path = destination.trim_start_matches('/');
                format!("{}/{}", root, path)
            }
            None => destination.to_string(),
        }
    }
}
