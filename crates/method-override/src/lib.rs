//! HTTP method override for the micro web stack
//!
//! Browsers and constrained clients can only send `GET` and `POST`. This crate lets
//! such a client transport a request with an allowed method (usually `POST`) and name
//! the method it really means in a header, a query parameter or a form field. The
//! effective method is replaced before routing sees the request.
//!
//! # Example
//!
//! ```
//! use http::{Method, Request};
//! use micro_method_override::{MethodOverride, MethodOverrideConfig, PendingVary, RequestView};
//!
//! let resolver = MethodOverride::new(MethodOverrideConfig::default().token_lookup("query:_method"));
//!
//! let mut req = Request::post("/items/42?_method=delete").body(()).unwrap();
//! resolver.resolve(&mut req, &mut PendingVary::new());
//!
//! assert_eq!(req.method(), Method::DELETE);
//! assert_eq!(req.original_method(), Some(&Method::POST));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: options, token lookup parsing and the immutable configuration
//! - [`resolver`]: the [`MethodOverride`] step and its [`Resolution`]
//! - [`extract`]: the header, query and form extraction strategies
//! - [`method`]: the registered method vocabulary used for validation
//! - [`request`] / [`response`]: the request and response views the resolver works on
//! - [`handler`]: a [`Handler`] trait and a `tower_layer::Layer` to put the resolver in front of a router
//!
//! # Rules
//!
//! - only requests whose original method is an allowed transport method are touched
//! - the first candidate wins when a source carries several values
//! - tokens are uppercased and must be registered methods, anything else is ignored
//! - the header source always adds its header name to the response `Vary`
//! - the original method is recorded once per request and never overwritten

pub mod body;
pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod method;
pub mod query;
pub mod request;
pub mod resolver;
pub mod response;

pub use body::ParsedBody;
pub use config::{MethodOverrideConfig, Options, TokenLookup, TokenSource};
pub use error::{BodyError, ConfigError};
pub use handler::{Handler, MethodOverrideHandler, MethodOverrideLayer, make_handler};
pub use method::MethodRegistry;
pub use query::{FieldValue, QueryParams};
pub use request::{OriginalMethod, RequestView};
pub use resolver::{MethodOverride, Resolution, SkipReason};
pub use response::{PendingVary, ResponseView};
