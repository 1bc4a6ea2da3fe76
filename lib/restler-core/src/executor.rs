//! Request executor capability and the single-use executable request.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Method, Request, Response, Result};

/// Boxed future returned by executors and authentication strategies.
pub type ResponseFuture<'a> = Pin<Box<dyn Future<Output = Result<Response<Bytes>>> + Send + 'a>>;

/// Sends a concrete HTTP request and returns the buffered response.
///
/// The facade crate provides a hyper-based implementation; tests usually
/// plug in an in-memory executor.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
///
/// use bytes::Bytes;
/// use restler_core::{Request, RequestExecutor, Response, ResponseFuture};
///
/// struct Echo;
///
/// impl RequestExecutor for Echo {
///     fn send(&self, request: Request<Bytes>) -> ResponseFuture<'_> {
///         let body = Bytes::from(request.url().to_string());
///         Box::pin(async move { Ok(Response::new(200, HashMap::new(), body)) })
///     }
/// }
/// ```
pub trait RequestExecutor: Send + Sync {
    /// Send the request.
    ///
    /// # Errors
    ///
    /// Returns a transport error ([`crate::Error::Connection`],
    /// [`crate::Error::Tls`], [`crate::Error::Timeout`] or
    /// [`crate::Error::InvalidRequest`]) if no response is received.
    fn send(&self, request: Request<Bytes>) -> ResponseFuture<'_>;
}

impl<E: RequestExecutor + ?Sized> RequestExecutor for Arc<E> {
    fn send(&self, request: Request<Bytes>) -> ResponseFuture<'_> {
        (**self).send(request)
    }
}

/// A fully resolved request plus the executor that will send it.
///
/// Handed to an [`crate::AuthenticationStrategy`], which may add headers
/// before calling [`ExecutableRequest::execute`]. Executing consumes it, so
/// each instance reaches the network at most once.
pub struct ExecutableRequest {
    request: Request<Bytes>,
    return_type: &'static str,
    executor: Arc<dyn RequestExecutor>,
}

impl ExecutableRequest {
    /// Creates a new executable request.
    #[must_use]
    pub fn new(
        request: Request<Bytes>,
        return_type: &'static str,
        executor: Arc<dyn RequestExecutor>,
    ) -> Self {
        Self {
            request,
            return_type,
            executor,
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.request.method()
    }

    /// Resolved target URI.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        self.request.url()
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.header(name)
    }

    /// Declared return type name of the invoked method.
    #[must_use]
    pub const fn return_type(&self) -> &'static str {
        self.return_type
    }

    /// The underlying request.
    #[must_use]
    pub const fn request(&self) -> &Request<Bytes> {
        &self.request
    }

    /// Sets a header, replacing any previous value under the same name in
    /// any case.
    #[must_use]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.request.set_header(name, value);
        self
    }

    /// Send the request through its executor.
    #[must_use]
    pub fn execute(self) -> ResponseFuture<'static> {
        let Self {
            request, executor, ..
        } = self;
        Box::pin(async move { executor.send(request).await })
    }
}

impl std::fmt::Debug for ExecutableRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutableRequest")
            .field("method", &self.request.method())
            .field("url", &self.request.url().as_str())
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct Recording {
        calls: AtomicUsize,
    }

    impl RequestExecutor for Recording {
        fn send(&self, request: Request<Bytes>) -> ResponseFuture<'_> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let auth = request.header("Authorization").unwrap_or("none").to_string();
            Box::pin(async move { Ok(Response::new(200, HashMap::new(), Bytes::from(auth))) })
        }
    }

    #[tokio::test]
    async fn execute_sends_once_with_headers() {
        let executor = Arc::new(Recording::default());
        let url = url::Url::parse("https://api.example.com/users").expect("url");
        let request = Request::builder(Method::Get, url).build();

        let executable = ExecutableRequest::new(request, "User", executor.clone())
            .with_header("Authorization", "Bearer token");
        assert_eq!(executable.return_type(), "User");
        assert_eq!(executable.method(), Method::Get);
        assert_eq!(executable.header("Authorization"), Some("Bearer token"));

        let response = executable.execute().await.expect("response");
        assert_eq!(response.body().as_ref(), b"Bearer token");
        assert_eq!(executor.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn with_header_replaces_any_case() {
        let url = url::Url::parse("https://api.example.com/users").expect("url");
        let request = Request::builder(Method::Get, url)
            .header("authorization", "Bearer caller")
            .build();

        let executable = ExecutableRequest::new(request, "User", Arc::new(Recording::default()))
            .with_header("Authorization", "Bearer configured");
        assert_eq!(executable.header("authorization"), Some("Bearer configured"));
        assert_eq!(executable.request().headers().len(), 1);
    }

    #[test]
    fn debug_omits_executor() {
        let url = url::Url::parse("https://api.example.com/").expect("url");
        let request = Request::builder(Method::Delete, url).build();
        let executable = ExecutableRequest::new(request, "()", Arc::new(Recording::default()));

        let debug = format!("{executable:?}");
        assert!(debug.contains("Delete"));
        assert!(debug.contains("https://api.example.com/"));
    }
}
