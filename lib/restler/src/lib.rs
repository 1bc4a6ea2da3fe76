//! Declarative REST client proxies for Rust.
//!
//! Describe a remote service as an annotated trait; `#[restler]` generates a
//! client whose methods map their arguments onto the declared route, send
//! the request and decode the JSON response. The return type picks how a
//! call runs:
//!
//! - `restler::Result<T>` on an `async fn`: executed on the caller's task
//! - [`DeferredResult<T>`]: spawned on the worker pool, the handle returns at once
//! - [`Callable<T>`]: nothing happens until [`Callable::call`]
//!
//! # Example
//!
//! ```no_run
//! use restler::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[derive(Debug, Serialize)]
//! pub struct NewUser {
//!     name: String,
//! }
//!
//! #[restler(path = "/api")]
//! #[rest_controller]
//! pub trait UserApi {
//!     #[get("/users/{id}")]
//!     async fn get_user(&self, id: u64, #[query] verbose: Option<bool>) -> restler::Result<User>;
//!
//!     #[post("/users")]
//!     fn create_user(&self, user: &NewUser) -> DeferredResult<User>;
//!
//!     #[get("/users")]
//!     fn list_users(&self, #[query] page: Option<u32>) -> Callable<Vec<User>>;
//! }
//!
//! # async fn run() -> restler::Result<()> {
//! let factory = Restler::new("https://api.example.com").build()?;
//! let users: UserApiClient = factory.produce_client()?;
//!
//! let user = users.get_user(42, Some(true)).await?;
//! let created = users.create_user(&NewUser { name: "Bob".into() });
//! let listing = users.list_users(Some(2));
//!
//! let all = listing.call().await?;
//! let bob = created.wait().await;
//! # let _ = (user, all, bob);
//! # Ok(())
//! # }
//! ```

mod auth;
mod builder;
mod client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;

pub use auth::{BasicAuthentication, BearerAuthentication};
pub use builder::Restler;
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, PoolConfig};

// Re-export tower for middleware composition
pub use tower;

// Core types, also referenced by generated code
pub use restler_core::{
    Argument, AuthenticationStrategy, Callable, ClientFactory, ClientFactoryBuilder, ContentType,
    ControllerMarker, DEFAULT_USER_AGENT, DefaultInvocationMapper, DeferredResult, Dispatcher,
    Error, ExecutableRequest, ExecutionStrategy, HttpInvocationExecutor, InvocationMapper, Method,
    MethodDescription, NoAuthentication, ParamLocation, ParamMeta, Request, RequestBuilder,
    RequestExecutor, Response, ResponseFuture, Result, ServiceConfig, ServiceConfigBuilder,
    ServiceInterface, ServiceMethodInvocation, StrategyTable, UriTemplate, build_uri, from_json,
    placeholders, select_strategy, to_json,
};

// Re-export http types for status codes and headers
pub use restler_core::{StatusCode, header};

pub use url;

// Re-export macros
pub use restler_macro::{controller, rest_controller, restler};
