//! reqwest-backed [`Transport`].

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use tracing::debug;

use interoute_core::{HttpRequest, HttpResponse, Transport, TransportError};

use crate::config::HttpBackendConfig;
use crate::error::Error;

/// Production transport using reqwest.
///
/// One client is shared by every call, so connections are reused across
/// routes.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    config: HttpBackendConfig,
}

impl ReqwestTransport {
    pub fn new(config: HttpBackendConfig) -> Result<Self, Error> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(header_map(&config.default_headers)?)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create with default configuration (30 second timeout, no root URL).
    pub fn with_default_config() -> Result<Self, Error> {
        Self::new(HttpBackendConfig::default())
    }

    pub fn config(&self) -> &HttpBackendConfig {
        &self.config
    }
}

fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, Error> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::try_from(name.as_str())?;
        let header_value = HeaderValue::try_from(value.as_str())?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Flatten a response header map. Repeated headers are joined with `", "`;
/// values that are not visible ASCII are skipped.
fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut collected = HashMap::with_capacity(headers.keys_len());
    for name in headers.keys() {
        let values: Vec<&str> = headers
            .get_all(name)
            .iter()
            .filter_map(|value| match value.to_str() {
                Ok(value) => Some(value),
                Err(_) => {
                    debug!(header = %name, "skipping non-text header value");
                    None
                }
            })
            .collect();
        if !values.is_empty() {
            collected.insert(name.to_string(), values.join(", "));
        }
    }
    collected
}

fn classify_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect {
            message: error.to_string(),
        }
    } else if error.is_body() || error.is_decode() {
        TransportError::Malformed {
            message: error.to_string(),
        }
    } else {
        TransportError::Request {
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.config.resolve_url(&request.url);
        let method: http::Method = request.method.into();

        let headers = header_map(&request.headers).map_err(|e| TransportError::Request {
            message: e.to_string(),
        })?;

        let mut req_builder = self.client.request(method, &url).headers(headers);

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.send().await.map_err(classify_error)?;

        let status = response.status().as_u16();

        let resp_headers = collect_headers(response.headers());
        let body = response.bytes().await.map_err(classify_error)?;

        debug!(url = %url, status, bytes = body.len(), "response received");

        let response = HttpResponse {
            status,
            headers: resp_headers,
            body,
        };

        if self.config.error_on_status && !response.is_success() {
            return Err(TransportError::Status { response });
        }

        Ok(response)
    }
}
