//! Core types and the invocation pipeline of the restler client proxy generator.
//!
//! A call on a generated client flows through:
//! - [`Dispatcher`] - the interception handler every generated method delegates to
//! - [`InvocationMapper`] - binds arguments into a [`ServiceMethodInvocation`]
//! - [`ExecutionStrategy`] - direct, deferred ([`DeferredResult`]) or lazy ([`Callable`]),
//!   chosen from the declared return type by [`select_strategy`]
//! - [`HttpInvocationExecutor`] - builds the URI, wraps sending with the
//!   [`AuthenticationStrategy`] and decodes the [`Response`]
//!
//! Clients are produced by a [`ClientFactory`] from a [`ServiceConfig`].

mod auth;
mod body;
mod callable;
mod config;
mod deferred;
mod description;
mod dispatch;
mod error;
mod executor;
mod factory;
mod http_executor;
mod invocation;
mod mapper;
mod method;
pub mod prelude;
mod request;
mod response;
mod strategy;
mod uri_template;

pub use auth::{AuthenticationStrategy, NoAuthentication};
pub use body::{ContentType, from_json, to_json};
pub use callable::Callable;
pub use config::{DEFAULT_USER_AGENT, ServiceConfig, ServiceConfigBuilder};
pub use deferred::DeferredResult;
pub use description::{ControllerMarker, MethodDescription, ParamLocation, ParamMeta};
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use executor::{ExecutableRequest, RequestExecutor, ResponseFuture};
pub use factory::{ClientFactory, ClientFactoryBuilder, ServiceInterface};
pub use http_executor::{HttpInvocationExecutor, build_uri};
pub use invocation::{Argument, ServiceMethodInvocation};
pub use mapper::{DefaultInvocationMapper, InvocationMapper};
pub use method::Method;
pub use request::{Headers, Request, RequestBuilder};
pub use response::Response;
pub use strategy::{ExecutionStrategy, StrategyTable, select_strategy};
pub use uri_template::{PATH_SEGMENT_ENCODE_SET, UriTemplate, placeholders};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
