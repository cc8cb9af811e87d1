//! What a caller gets back from a route.

use std::collections::HashMap;

use http::StatusCode;

use crate::error::RoutingError;

/// Outcome of a status-aware route.
///
/// Status and headers are always known. On a 2xx response the decoded body
/// may be present; when the transport raised because of the status, the
/// failure is kept in `routing_error`.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequestResponse<R> {
    body: Option<R>,
    status: StatusCode,
    headers: HashMap<String, String>,
    routing_error: Option<RoutingError>,
}

impl<R> RouteRequestResponse<R> {
    pub fn new(
        body: Option<R>,
        status: StatusCode,
        headers: HashMap<String, String>,
        routing_error: Option<RoutingError>,
    ) -> Self {
        Self {
            body,
            status,
            headers,
            routing_error,
        }
    }

    /// Status of the response, or of the failure that carried one.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Response headers, also kept when the server rejected the call.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// The transport failure this response was recovered from.
    pub fn routing_error(&self) -> Option<&RoutingError> {
        self.routing_error.as_ref()
    }

    /// The decoded body, if any.
    pub fn result(&self) -> Option<&R> {
        self.body.as_ref()
    }

    pub fn into_result(self) -> Option<R> {
        self.body
    }

    /// The body (possibly absent) on 2xx, the status otherwise.
    pub fn as_result(&self) -> Result<Option<&R>, StatusCode> {
        if self.status.is_success() {
            Ok(self.body.as_ref())
        } else {
            Err(self.status)
        }
    }

    /// The body when present, otherwise the stored routing error.
    ///
    /// `Err(None)` means there is neither: typically a 2xx with an empty
    /// body, or a non-2xx the transport returned normally.
    pub fn response_as_result(&self) -> Result<&R, Option<&RoutingError>> {
        match &self.body {
            Some(body) => Ok(body),
            None => Err(self.routing_error.as_ref()),
        }
    }

    /// Always `Ok`: a response wrapper only exists once a status is known.
    pub fn status_as_result(&self) -> Result<StatusCode, &RoutingError> {
        Ok(self.status)
    }
}

/// Result of executing a route, shaped by its [`crate::ReturnKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum RouteReply<R> {
    /// Plain route: the decoded body, absent for void routes or empty bodies.
    Value(Option<R>),
    /// Status-aware route.
    Response(RouteRequestResponse<R>),
}

impl<R> RouteReply<R> {
    /// The decoded body regardless of route kind.
    pub fn into_value(self) -> Option<R> {
        match self {
            RouteReply::Value(value) => value,
            RouteReply::Response(response) => response.into_result(),
        }
    }

    /// The wrapper of a status-aware route, `None` for plain routes.
    pub fn into_response(self) -> Option<RouteRequestResponse<R>> {
        match self {
            RouteReply::Response(response) => Some(response),
            RouteReply::Value(_) => None,
        }
    }

    pub fn response(&self) -> Option<&RouteRequestResponse<R>> {
        match self {
            RouteReply::Response(response) => Some(response),
            RouteReply::Value(_) => None,
        }
    }
}
