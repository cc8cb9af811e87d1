//! # interoute-http
//!
//! HTTP transport for interoute routes.
//!
//! This crate provides the reqwest-backed [`Transport`](interoute_core::Transport)
//! and its configuration. Routes themselves are compiled by `interoute-core`.
//!
//! ## Example
//!
//! ```ignore
//! use interoute_core::{args, MethodMetadata, Parameter, ResultType};
//! use interoute_http::{backend, HttpBackendConfig};
//!
//! let config = HttpBackendConfig::new().with_root_url("https://api.example.com");
//!
//! let router = interoute_core::Router::builder(backend(config)?)
//!     .route(
//!         MethodMetadata::get("userDetails", "/user/{0 name}")
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

pub mod config;
pub mod error;
pub mod transport;

pub use config::HttpBackendConfig;
pub use error::Error;
pub use transport::ReqwestTransport;

use interoute_core::{Backend, Router, RouterBuilder};

/// A backend using [`ReqwestTransport`] and the JSON codec.
pub fn backend(config: HttpBackendConfig) -> Result<Backend, Error> {
    Ok(Backend::new(ReqwestTransport::new(config)?))
}

/// Start building a router served over HTTP.
pub fn router(config: HttpBackendConfig) -> Result<RouterBuilder, Error> {
    Ok(Router::builder(backend(config)?))
}
