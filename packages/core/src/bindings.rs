//! Capabilities a router lends to its routes at compile time.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::metadata::MethodId;

/// Supplies request headers, invoked once per call.
pub trait HeadersProvider: Send + Sync {
    fn headers(&self) -> HashMap<String, String>;
}

impl<F> HeadersProvider for F
where
    F: Fn() -> HashMap<String, String> + Send + Sync,
{
    fn headers(&self) -> HashMap<String, String> {
        self()
    }
}

/// A fixed set of headers.
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders(pub HashMap<String, String>);

impl StaticHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl HeadersProvider for StaticHeaders {
    fn headers(&self) -> HashMap<String, String> {
        self.0.clone()
    }
}

/// A zero-argument, string-returning method of the router instance.
///
/// `{basePath()}` in a destination resolves by calling the accessor
/// registered under `basePath`.
#[derive(Clone)]
pub struct Accessor(Arc<dyn Fn() -> String + Send + Sync>);

impl Accessor {
    pub fn new(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Accessor(Arc::new(f))
    }

    /// Invoke the accessor.
    pub fn call(&self) -> String {
        (self.0)()
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor(..)")
    }
}

/// Accessors and headers providers available to route compilation.
#[derive(Clone, Default)]
pub struct Bindings {
    accessors: HashMap<String, Accessor>,
    headers: HashMap<MethodId, Arc<dyn HeadersProvider>>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an accessor destinations can call as `{name()}`.
    pub fn with_accessor(
        mut self,
        name: impl Into<String>,
        f: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        self.insert_accessor(name, f);
        self
    }

    /// Attach a headers provider to the method with this signature.
    pub fn with_headers_provider(
        mut self,
        method: impl Into<MethodId>,
        provider: impl HeadersProvider + 'static,
    ) -> Self {
        self.insert_headers_provider(method, provider);
        self
    }

    pub fn insert_accessor(
        &mut self,
        name: impl Into<String>,
        f: impl Fn() -> String + Send + Sync + 'static,
    ) {
        self.accessors.insert(name.into(), Accessor::new(f));
    }

    pub fn insert_headers_provider(
        &mut self,
        method: impl Into<MethodId>,
        provider: impl HeadersProvider + 'static,
    ) {
        self.headers.insert(method.into(), Arc::new(provider));
    }

    /// Look up an accessor by name.
    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.get(name)
    }

    /// The headers provider attached to a method, if any.
    pub fn headers_provider(&self, method: &MethodId) -> Option<Arc<dyn HeadersProvider>> {
        self.headers.get(method).cloned()
    }
}
