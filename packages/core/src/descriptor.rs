//! Per-method compiled route.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::bindings::{Accessor, Bindings, HeadersProvider};
use crate::error::GenerationError;
use crate::metadata::{Method, MethodId, MethodMetadata, Parameter, ResultType, ReturnKind};
use crate::notation::Notation;

/// Everything needed to execute one method, resolved at build time.
///
/// Descriptors are immutable and shared by every call of the method.
#[derive(Clone)]
pub struct RouteDescriptor {
    pub(crate) method_id: MethodId,
    pub(crate) notation: Notation,
    pub(crate) verb: Method,
    pub(crate) body_index: Option<usize>,
    pub(crate) headers_provider: Option<Arc<dyn HeadersProvider>>,
    pub(crate) result_type: ResultType,
    pub(crate) return_kind: ReturnKind,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) accessors: HashMap<String, Accessor>,
}

impl RouteDescriptor {
    /// Compile a method description.
    ///
    /// Every parameter reference and accessor call in the destination is
    /// checked here, so a successfully compiled route cannot fail to resolve
    /// its destination for a well-formed argument list.
    pub fn compile(
        metadata: &MethodMetadata,
        bindings: &Bindings,
    ) -> Result<Self, GenerationError> {
        let method_id = metadata.id();

        let notation = Notation::parse(&metadata.destination).map_err(|source| {
            GenerationError::DestinationParseFailed {
                method: method_id.clone(),
                source,
            }
        })?;

        let count = metadata.parameters.len();
        for index in notation.param_refs() {
            let parameter = metadata.parameters.get(index).ok_or_else(|| {
                GenerationError::ParameterIndexOutOfRange {
                    method: method_id.clone(),
                    index,
                    count,
                }
            })?;
            if parameter.nullable {
                return Err(GenerationError::NullableParameterReference {
                    method: method_id,
                    index,
                });
            }
        }

        let mut accessors = HashMap::new();
        for name in notation.method_calls() {
            let accessor =
                bindings
                    .accessor(name)
                    .ok_or_else(|| GenerationError::UnknownAccessor {
                        method: method_id.clone(),
                        name: name.to_string(),
                    })?;
            accessors.insert(name.to_string(), accessor.clone());
        }

        let mut body_positions = metadata
            .parameters
            .iter()
            .enumerate()
            .filter(|(_, p)| p.body)
            .map(|(i, _)| i);
        let body_index = body_positions.next();
        if body_positions.next().is_some() {
            return Err(GenerationError::MultipleBodyParameters { method: method_id });
        }

        let verb = metadata.verb.unwrap_or_default();
        let headers_provider = bindings.headers_provider(&method_id);

        debug!(
            method = %method_id,
            verb = %verb,
            destination = %notation,
            segments = notation.len(),
            "compiled route"
        );

        Ok(Self {
            method_id,
            notation,
            verb,
            body_index,
            headers_provider,
            result_type: metadata.result_type.clone(),
            return_kind: metadata.return_kind,
            parameters: metadata.parameters.clone(),
            accessors,
        })
    }

    /// Signature this route is registered under.
    pub fn method_id(&self) -> &MethodId {
        &self.method_id
    }

    /// The parsed destination.
    pub fn notation(&self) -> &Notation {
        &self.notation
    }

    /// HTTP verb, GET when the method declared none.
    pub fn verb(&self) -> Method {
        self.verb
    }

    /// Position of the argument sent as the request body.
    pub fn body_index(&self) -> Option<usize> {
        self.body_index
    }

    /// Whether a headers provider was attached at build time.
    pub fn has_headers_provider(&self) -> bool {
        self.headers_provider.is_some()
    }

    /// Type the response body is decoded into.
    pub fn result_type(&self) -> &ResultType {
        &self.result_type
    }

    pub fn return_kind(&self) -> ReturnKind {
        self.return_kind
    }

    /// Whether calls yield a [`crate::RouteRequestResponse`].
    pub fn is_status_aware(&self) -> bool {
        self.return_kind == ReturnKind::StatusAware
    }

    /// Declared parameters, in argument order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

impl fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("method_id", &self.method_id)
            .field("notation", &self.notation)
            .field("verb", &self.verb)
            .field("body_index", &self.body_index)
            .field("headers_provider", &self.headers_provider.is_some())
            .field("result_type", &self.result_type)
            .field("return_kind", &self.return_kind)
            .finish()
    }
}
