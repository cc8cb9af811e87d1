//! Dispatch table from method identity to compiled route.
//!
//! A router is built once from a set of method descriptions. Every method is
//! compiled up front; the first failure aborts the build, so a router either
//! serves all of its methods or does not exist.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::bindings::{Bindings, HeadersProvider};
use crate::descriptor::RouteDescriptor;
use crate::error::{GenerationError, RoutingError};
use crate::executor::Backend;
use crate::metadata::{MethodId, MethodMetadata};
use crate::response::RouteReply;

/// Build the argument vector for a route call.
///
/// Arguments use `serde_json::json!` syntax, so objects can be written inline.
///
/// ```rust
/// use interoute_core::args;
///
/// let args = args!["alice", 3, {"name": "test"}];
/// assert_eq!(args[1], serde_json::json!(3));
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:tt)*) => {
        match ::serde_json::json!([$($arg)*]) {
            ::serde_json::Value::Array(args) => args,
            _ => ::std::vec::Vec::new(),
        }
    };
}

pub struct RouterBuilder {
    backend: Backend,
    bindings: Bindings,
    methods: Vec<MethodMetadata>,
}

impl RouterBuilder {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            bindings: Bindings::new(),
            methods: Vec::new(),
        }
    }

    /// Register a zero-argument accessor callable from destinations.
    pub fn accessor(
        mut self,
        name: impl Into<String>,
        f: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        self.bindings.insert_accessor(name, f);
        self
    }

    /// Attach a headers provider to one method.
    pub fn headers_provider(
        mut self,
        method: impl Into<MethodId>,
        provider: impl HeadersProvider + 'static,
    ) -> Self {
        self.bindings.insert_headers_provider(method, provider);
        self
    }

    /// Add a method to compile.
    pub fn route(mut self, metadata: MethodMetadata) -> Self {
        self.methods.push(metadata);
        self
    }

    /// Add several methods to compile.
    pub fn routes(mut self, metadata: impl IntoIterator<Item = MethodMetadata>) -> Self {
        self.methods.extend(metadata);
        self
    }

    /// Compile every method. Fails on the first method that does not compile.
    pub fn build(self) -> Result<Router, GenerationError> {
        let mut routes = HashMap::with_capacity(self.methods.len());

        for metadata in &self.methods {
            let descriptor = RouteDescriptor::compile(metadata, &self.bindings)?;
            let id = descriptor.method_id().clone();
            if routes.contains_key(&id) {
                return Err(GenerationError::DuplicateMethod { method: id });
            }
            routes.insert(id, Arc::new(descriptor));
        }

        debug!(routes = routes.len(), "router built");

        Ok(Router {
            backend: self.backend,
            routes,
        })
    }
}

/// A set of compiled routes sharing one backend.
#[derive(Clone)]
pub struct Router {
    backend: Backend,
    routes: HashMap<MethodId, Arc<RouteDescriptor>>,
}

impl Router {
    /// Start building a router over `backend`.
    pub fn builder(backend: Backend) -> RouterBuilder {
        RouterBuilder::new(backend)
    }

    /// Look up a route by method signature, e.g. `userDetails(String)`.
    pub fn route(&self, method: &str) -> Option<Route> {
        self.routes.get(&MethodId::from(method)).map(|descriptor| Route {
            descriptor: descriptor.clone(),
            backend: self.backend.clone(),
        })
    }

    /// Call the route registered under `method`.
    pub async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        args: Vec<Value>,
    ) -> Result<RouteReply<R>, RoutingError> {
        let route = self.route(method).ok_or_else(|| RoutingError::UnknownRoute {
            method: MethodId::from(method),
        })?;
        route.call(args).await
    }

    /// Signatures of every compiled route.
    pub fn method_ids(&self) -> impl Iterator<Item = &MethodId> {
        self.routes.keys()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// A callable handle on one compiled route.
#[derive(Clone)]
pub struct Route {
    descriptor: Arc<RouteDescriptor>,
    backend: Backend,
}

impl Route {
    pub fn descriptor(&self) -> &RouteDescriptor {
        &self.descriptor
    }

    /// Execute the route and wait for its reply.
    pub async fn call<R: DeserializeOwned>(
        &self,
        args: Vec<Value>,
    ) -> Result<RouteReply<R>, RoutingError> {
        self.descriptor.execute(&self.backend, args).await
    }

    /// Start the call on the current tokio runtime and return at once.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<R>(&self, args: Vec<Value>) -> JoinHandle<Result<RouteReply<R>, RoutingError>>
    where
        R: DeserializeOwned + Send + 'static,
    {
        let route = self.clone();
        tokio::spawn(async move { route.call(args).await })
    }
}
