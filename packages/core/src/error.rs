use crate::codec::CodecError;
use crate::metadata::MethodId;
use crate::notation::ParseError;
use crate::transport::TransportError;

/// A route could not be built. Aborts construction of the whole router.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("{method}: invalid destination: {source}")]
    DestinationParseFailed {
        method: MethodId,
        #[source]
        source: ParseError,
    },

    #[error("{method}: parameter index {index} out of range ({count} parameters declared)")]
    ParameterIndexOutOfRange {
        method: MethodId,
        index: usize,
        count: usize,
    },

    #[error("{method}: nullable parameter {index} cannot be used in the destination")]
    NullableParameterReference { method: MethodId, index: usize },

    #[error("{method}: more than one body parameter")]
    MultipleBodyParameters { method: MethodId },

    #[error("{method}: no accessor named '{name}'")]
    UnknownAccessor { method: MethodId, name: String },

    #[error("{method}: declared more than once")]
    DuplicateMethod { method: MethodId },
}

/// A call could not produce a usable response.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("request failed with status {status}")]
    Status { status: http::StatusCode },

    #[error("failed to encode request body: {0}")]
    Encode(#[source] CodecError),

    #[error("failed to decode response body: {message}")]
    Decode { message: String },

    #[error("{method}: expected {expected} arguments, got {actual}")]
    ArgumentCount {
        method: MethodId,
        expected: usize,
        actual: usize,
    },

    #[error("{method}: argument {index} ('{name}') is null")]
    NullArgument {
        method: MethodId,
        index: usize,
        name: String,
    },

    #[error("no route for method {method}")]
    UnknownRoute { method: MethodId },
}

impl RoutingError {
    /// Status of the server response behind this error, when there was one.
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            RoutingError::Status { status } => Some(*status),
            RoutingError::Transport(e) => e
                .embedded_response()
                .and_then(|r| http::StatusCode::from_u16(r.status).ok()),
            _ => None,
        }
    }
}

impl From<CodecError> for RoutingError {
    fn from(error: CodecError) -> Self {
        match error {
            CodecError::Encode { .. } => RoutingError::Encode(error),
            CodecError::Decode { .. } => RoutingError::Decode {
                message: error.to_string(),
            },
        }
    }
}
