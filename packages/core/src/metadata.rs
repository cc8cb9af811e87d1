//! Declarative description of a routed method.
//!
//! Whatever builds a router (a derive, a hand-written table, a config file)
//! describes each method with a [`MethodMetadata`]. It is consumed once, when
//! the route is compiled.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP method for requests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => http::Method::GET,
            Method::POST => http::Method::POST,
            Method::PUT => http::Method::PUT,
            Method::DELETE => http::Method::DELETE,
            Method::PATCH => http::Method::PATCH,
            Method::HEAD => http::Method::HEAD,
            Method::OPTIONS => http::Method::OPTIONS,
        }
    }
}

impl TryFrom<http::Method> for Method {
    type Error = http::Method;

    fn try_from(method: http::Method) -> Result<Self, Self::Error> {
        match method {
            http::Method::GET => Ok(Method::GET),
            http::Method::POST => Ok(Method::POST),
            http::Method::PUT => Ok(Method::PUT),
            http::Method::DELETE => Ok(Method::DELETE),
            http::Method::PATCH => Ok(Method::PATCH),
            http::Method::HEAD => Ok(Method::HEAD),
            http::Method::OPTIONS => Ok(Method::OPTIONS),
            other => Err(other),
        }
    }
}

/// How the caller wants to see the outcome of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    /// Non-2xx responses and transport failures are errors.
    #[default]
    Plain,
    /// The caller receives a [`crate::RouteRequestResponse`] and can inspect
    /// status and headers even when the call failed.
    StatusAware,
}

/// The value a route decodes on success.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// Void route: the request is fired and nothing is decoded.
    #[default]
    Unit,
    /// A decoded value, named for diagnostics and codec hints.
    Value(String),
}

impl ResultType {
    /// A decoded result of the named type.
    pub fn value(type_name: impl Into<String>) -> Self {
        ResultType::Value(type_name.into())
    }

    /// True for void methods, whose bodies are never decoded.
    pub fn is_unit(&self) -> bool {
        matches!(self, ResultType::Unit)
    }
}

/// A declared method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    /// Declared type, used to build the method signature.
    pub type_name: String,

    /// Whether this parameter is sent as the request body.
    #[serde(default)]
    pub body: bool,

    /// Whether the caller may pass `null` for this parameter.
    #[serde(default)]
    pub nullable: bool,
}

impl Parameter {
    /// A non-body, non-nullable parameter.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            body: false,
            nullable: false,
        }
    }

    /// A `String` parameter.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, "String")
    }

    /// Send this argument as the request body.
    pub fn as_body(mut self) -> Self {
        self.body = true;
        self
    }

    /// Allow `null` for this argument. Such parameters cannot appear in the destination.
    pub fn as_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Identity of a declared method: its name plus parameter types, e.g.
/// `userDetails(String,String)`. Overloads get distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodId(String);

impl MethodId {
    pub fn new(signature: impl Into<String>) -> Self {
        MethodId(signature.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MethodId {
    fn from(s: &str) -> Self {
        MethodId(s.to_string())
    }
}

impl From<String> for MethodId {
    fn from(s: String) -> Self {
        MethodId(s)
    }
}

/// Everything the route compiler needs to know about one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodMetadata {
    pub name: String,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Declared verb; `None` means GET.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb: Option<Method>,

    /// Destination notation, see [`crate::notation`].
    pub destination: String,

    #[serde(default)]
    pub return_kind: ReturnKind,

    #[serde(default)]
    pub result_type: ResultType,
}

impl MethodMetadata {
    /// A method with no verb, parameters or result; the verb defaults to GET.
    pub fn new(name: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            verb: None,
            destination: destination.into(),
            return_kind: ReturnKind::Plain,
            result_type: ResultType::Unit,
        }
    }

    pub fn get(name: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::new(name, destination).with_verb(Method::GET)
    }

    pub fn post(name: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::new(name, destination).with_verb(Method::POST)
    }

    pub fn put(name: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::new(name, destination).with_verb(Method::PUT)
    }

    pub fn delete(name: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::new(name, destination).with_verb(Method::DELETE)
    }

    /// Set the HTTP verb.
    pub fn with_verb(mut self, verb: Method) -> Self {
        self.verb = Some(verb);
        self
    }

    /// Append the next positional parameter.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set the type the response body decodes into.
    pub fn returning(mut self, result_type: ResultType) -> Self {
        self.result_type = result_type;
        self
    }

    /// Return a response wrapper instead of the bare value.
    pub fn status_aware(mut self) -> Self {
        self.return_kind = ReturnKind::StatusAware;
        self
    }

    /// The overload signature, e.g. `userDetails(String,String)`.
    pub fn id(&self) -> MethodId {
        let types: Vec<&str> = self
            .parameters
            .iter()
            .map(|p| p.type_name.as_str())
            .collect();
        MethodId(format!("{}({})", self.name, types.join(",")))
    }
}
