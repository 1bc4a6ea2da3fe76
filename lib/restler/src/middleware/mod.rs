//! Tower middleware for the [`crate::HyperClient`] transport.
//!
//! Layers wrap the raw transport service, so they see concrete
//! [`crate::Request`]s after URI building and authentication.
//!
//! | Feature | Helper |
//! |---------|--------|
//! | `middleware-logging` | `.with_logging()`, `.with_debug_logging()` |
//! | `middleware-concurrency` | `.with_concurrency_limit()` |
//!
//! Any other layer goes through [`crate::HyperClientBuilder::layer`]:
//!
//! ```no_run
//! use restler::HyperClient;
//! use restler::middleware::{ConcurrencyLimitLayer, LoggingLayer};
//!
//! let client = HyperClient::builder()
//!     .layer(LoggingLayer::debug())
//!     .layer(ConcurrencyLimitLayer::new(4))
//!     .build();
//! ```

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

pub use tower::limit::ConcurrencyLimitLayer;
pub use tower::{Layer, ServiceBuilder};
