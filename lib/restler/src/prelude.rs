//! Glob-importable set of the types most client code needs.
//!
//! ```
//! use restler::prelude::*;
//! ```

pub use crate::{
    AuthenticationStrategy, BasicAuthentication, BearerAuthentication, Callable, ClientConfig,
    ClientFactory, DeferredResult, Error, HyperClient, Method, Request, Response, Restler, Result,
    StatusCode, controller, rest_controller, restler,
};
pub use serde::{Deserialize, Serialize};
