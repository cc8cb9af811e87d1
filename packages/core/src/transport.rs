//! HTTP exchange abstraction.
//!
//! The route executor never talks to the network itself. It hands an
//! [`HttpRequest`] to a [`Transport`] and classifies what comes back, which
//! keeps the executor testable without a server.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;

use crate::metadata::{Method, ResultType};

/// A fully assembled request, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,

    /// Resolved destination. May be relative to the transport's root URL.
    pub url: String,

    pub headers: HashMap<String, String>,

    /// Encoded body, absent for bodiless routes.
    pub body: Option<Bytes>,

    /// What the route expects to decode from a successful response.
    pub result_type: ResultType,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            result_type: ResultType::Unit,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// HTTP response from a request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    pub headers: HashMap<String, String>,

    /// Raw response body, empty when the server sent none
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// A response carrying `value` serialized as JSON.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status)
            .with_header("content-type", "application/json")
            .with_body(value.to_string())
    }

    /// Check if the response status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response status indicates a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the response status indicates a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Failures raised by a [`Transport`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("connection failed: {message}")]
    Connect { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("malformed response: {message}")]
    Malformed { message: String },

    #[error("request failed: {message}")]
    Request { message: String },

    /// The server answered, but the transport treats the status as a failure.
    #[error("server responded with status {}", .response.status)]
    Status { response: HttpResponse },
}

impl TransportError {
    /// The response the server sent, if the failure carries one.
    pub fn embedded_response(&self) -> Option<&HttpResponse> {
        match self {
            TransportError::Status { response } => Some(response),
            _ => None,
        }
    }
}

/// Something that can perform one HTTP exchange.
///
/// Implementations are shared by every in-flight call, hence `Send + Sync`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
