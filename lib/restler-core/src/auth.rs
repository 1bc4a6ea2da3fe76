//! Authentication strategy capability.

use crate::{ExecutableRequest, ResponseFuture};

/// Wraps the sending of an [`ExecutableRequest`] with authentication.
///
/// A strategy may attach credentials, send the request once and interpret
/// the outcome. Its failures are returned to the caller untouched.
pub trait AuthenticationStrategy: Send + Sync {
    /// Send `request` with authentication applied.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Authentication`] when authentication fails,
    /// or whatever the underlying executor returns.
    fn execute_authenticated(&self, request: ExecutableRequest) -> ResponseFuture<'_>;
}

/// Sends requests as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuthentication;

impl AuthenticationStrategy for NoAuthentication {
    fn execute_authenticated(&self, request: ExecutableRequest) -> ResponseFuture<'_> {
        request.execute()
    }
}
