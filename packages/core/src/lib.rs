//! # interoute-core
//!
//! Turns method descriptions into HTTP routes.
//!
//! Each method declares a destination notation such as
//! `{basePath()}/user/{0 name}?context={1}`. At build time the notation is
//! parsed and checked against the method's parameters, producing a
//! [`RouteDescriptor`]. At call time the descriptor resolves the destination
//! from the call's arguments, sends the request through a [`Transport`], and
//! classifies the outcome:
//!
//! - plain routes ([`ReturnKind::Plain`]) yield the decoded value, and every
//!   non-2xx response or transport failure is a [`RoutingError`];
//! - status-aware routes ([`ReturnKind::StatusAware`]) yield a
//!   [`RouteRequestResponse`] whose status and headers stay observable when
//!   the server rejected the request.
//!
//! ## Example
//!
//! ```ignore
//! use interoute_core::{args, Backend, MethodMetadata, Parameter, ResultType, Router};
//!
//! let router = Router::builder(Backend::new(transport))
//!     .accessor("userServicePath", || "/user".to_string())
//!     .route(
//!         MethodMetadata::get("userDetails", "{userServicePath()}/{0 name}")
//!             .with_parameter(Parameter::text("name"))
//!             .returning(ResultType::value("User")),
//!     )
//!     .build()?;
//!
//! let user: Option<User> = router
//!     .call("userDetails(String)", args!["alice"])
//!     .await?
//!     .into_value();
//! ```

pub mod bindings;
pub mod call;
pub mod codec;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod metadata;
pub mod notation;
pub mod response;
pub mod router;
pub mod transport;

pub use bindings::{Accessor, Bindings, HeadersProvider, StaticHeaders};
pub use call::RouteCall;
pub use codec::{Codec, CodecError, JsonCodec};
pub use descriptor::RouteDescriptor;
pub use error::{GenerationError, RoutingError};
pub use executor::{Backend, ExecutionOutcome};
pub use metadata::{Method, MethodId, MethodMetadata, Parameter, ResultType, ReturnKind};
pub use notation::{Notation, ParseError, Segment};
pub use response::{RouteReply, RouteRequestResponse};
pub use router::{Route, Router, RouterBuilder};
pub use transport::{HttpRequest, HttpResponse, Transport, TransportError};

pub use bytes::Bytes;
pub use http::StatusCode;
