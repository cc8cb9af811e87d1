//! Route execution and outcome classification.
//!
//! A call moves through `Built -> RequestAssembled -> Sent` and ends either
//! `Completed` (the transport returned a response) or `TransportFailed`.
//! The terminal [`ExecutionOutcome`] is then classified according to the
//! route's [`ReturnKind`].

use std::sync::Arc;

use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::call::RouteCall;
use crate::codec::{Codec, JsonCodec};
use crate::descriptor::RouteDescriptor;
use crate::error::RoutingError;
use crate::metadata::ReturnKind;
use crate::response::{RouteReply, RouteRequestResponse};
use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};

/// Collaborators shared by every call of every route.
#[derive(Clone)]
pub struct Backend {
    transport: Arc<dyn Transport>,
    codec: Arc<dyn Codec>,
}

impl Backend {
    /// Backend with the JSON codec.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            codec: Arc::new(JsonCodec),
        }
    }

    /// Replace the JSON codec.
    pub fn with_codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn codec(&self) -> &Arc<dyn Codec> {
        &self.codec
    }
}

/// Raw result of one HTTP exchange, before classification.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Completed(HttpResponse),
    TransportFailed(TransportError),
}

impl RouteDescriptor {
    /// Build the request for a validated call.
    pub fn assemble(
        &self,
        call: &RouteCall<'_>,
        codec: &dyn Codec,
    ) -> Result<HttpRequest, RoutingError> {
        let headers = self
            .headers_provider
            .as_ref()
            .map(|provider| provider.headers())
            .unwrap_or_default();

        let mut request = HttpRequest {
            method: self.verb,
            url: call.destination(),
            headers,
            body: None,
            result_type: self.result_type.clone(),
        };

        if let Some(body) = call.body().filter(|body| !body.is_null()) {
            request.body = Some(codec.encode(body)?);
            // Header names are case-insensitive; a provider's content type wins.
            let has_content_type = request
                .headers
                .keys()
                .any(|name| name.eq_ignore_ascii_case("content-type"));
            if !has_content_type {
                request
                    .headers
                    .insert("content-type".to_string(), codec.content_type().to_string());
            }
        }

        Ok(request)
    }

    /// Execute the route with the given arguments.
    pub async fn execute<R: DeserializeOwned>(
        &self,
        backend: &Backend,
        args: Vec<Value>,
    ) -> Result<RouteReply<R>, RoutingError> {
        let call = RouteCall::new(self, args)?;
        let request = self.assemble(&call, backend.codec.as_ref())?;

        debug!(
            method = %self.method_id,
            verb = %request.method,
            url = %request.url,
            "sending request"
        );

        let outcome = match backend.transport.send(request).await {
            Ok(response) => ExecutionOutcome::Completed(response),
            Err(error) => {
                warn!(method = %self.method_id, error = %error, "transport failed");
                ExecutionOutcome::TransportFailed(error)
            }
        };

        self.classify(outcome, backend.codec.as_ref())
    }

    /// Turn a terminal outcome into what the caller sees.
    pub fn classify<R: DeserializeOwned>(
        &self,
        outcome: ExecutionOutcome,
        codec: &dyn Codec,
    ) -> Result<RouteReply<R>, RoutingError> {
        match (self.return_kind, outcome) {
            (ReturnKind::Plain, ExecutionOutcome::Completed(response)) => {
                if response.is_success() {
                    Ok(RouteReply::Value(self.decode(&response, codec)?))
                } else {
                    Err(RoutingError::Status {
                        status: status_code(response.status)?,
                    })
                }
            }
            (ReturnKind::Plain, ExecutionOutcome::TransportFailed(error)) => {
                Err(RoutingError::Transport(error))
            }
            (ReturnKind::StatusAware, ExecutionOutcome::Completed(response)) => {
                let status = status_code(response.status)?;
                let body = if response.is_success() {
                    self.decode(&response, codec)?
                } else {
                    None
                };
                debug!(method = %self.method_id, status = status.as_u16(), "completed");
                Ok(RouteReply::Response(RouteRequestResponse::new(
                    body,
                    status,
                    response.headers,
                    None,
                )))
            }
            (ReturnKind::StatusAware, ExecutionOutcome::TransportFailed(error)) => {
                let (status, headers) = match error.embedded_response() {
                    Some(response) => (status_code(response.status)?, response.headers.clone()),
                    None => return Err(RoutingError::Transport(error)),
                };
                Ok(RouteReply::Response(RouteRequestResponse::new(
                    None,
                    status,
                    headers,
                    Some(RoutingError::Transport(error)),
                )))
            }
        }
    }

    fn decode<R: DeserializeOwned>(
        &self,
        response: &HttpResponse,
        codec: &dyn Codec,
    ) -> Result<Option<R>, RoutingError> {
        if self.result_type.is_unit() || response.body.is_empty() {
            return Ok(None);
        }

        let value = codec.decode(&response.body, &self.result_type)?;
        if value.is_null() {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| RoutingError::Decode {
                message: format!("{}: {}", self.method_id, e),
            })
    }
}

fn status_code(status: u16) -> Result<StatusCode, RoutingError> {
    StatusCode::from_u16(status).map_err(|_| {
        RoutingError::Transport(TransportError::Malformed {
            message: format!("invalid status code {}", status),
        })
    })
}
