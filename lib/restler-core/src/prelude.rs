//! Prelude module for convenient imports.
//!
//! ```ignore
//! use restler_core::prelude::*;
//! ```

pub use crate::{
    AuthenticationStrategy, Callable, ClientFactory, ControllerMarker, DeferredResult, Error,
    ExecutableRequest, Method, NoAuthentication, Request, RequestExecutor, Response,
    ResponseFuture, Result, ServiceConfig, ServiceInterface,
};
