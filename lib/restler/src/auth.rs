//! Credential-attaching authentication strategies.

use std::sync::Arc;

use base64::Engine;
use bytes::Bytes;
use tracing::warn;

use crate::{AuthenticationStrategy, Error, ExecutableRequest, Response, ResponseFuture, Result};

const AUTHORIZATION: &str = "Authorization";

/// Turn a `401 Unauthorized` into [`Error::Authentication`].
fn reject_unauthorized(response: Response<Bytes>, scheme: &str) -> Result<Response<Bytes>> {
    if response.status() == 401 {
        warn!(scheme, "credentials rejected by server");
        return Err(Error::authentication(format!(
            "{scheme} credentials rejected: {} {}",
            response.status(),
            response.reason()
        )));
    }
    Ok(response)
}

/// Sends `Authorization: Bearer <token>` with every request.
///
/// # Example
///
/// ```
/// use restler::BearerAuthentication;
///
/// let auth = BearerAuthentication::new("my-secret-token");
/// assert!(!format!("{auth:?}").contains("my-secret-token"));
/// ```
#[derive(Clone)]
pub struct BearerAuthentication {
    token: Arc<str>,
}

impl BearerAuthentication {
    /// Create a strategy sending the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Arc::from(token.into()),
        }
    }
}

impl std::fmt::Debug for BearerAuthentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuthentication").finish_non_exhaustive()
    }
}

impl AuthenticationStrategy for BearerAuthentication {
    fn execute_authenticated(&self, request: ExecutableRequest) -> ResponseFuture<'_> {
        let request = request.with_header(AUTHORIZATION, format!("Bearer {}", self.token));
        Box::pin(async move { reject_unauthorized(request.execute().await?, "bearer") })
    }
}

/// Sends `Authorization: Basic <base64(user:password)>` with every request.
#[derive(Clone)]
pub struct BasicAuthentication {
    username: Arc<str>,
    encoded_credentials: Arc<str>,
}

impl BasicAuthentication {
    /// Create a strategy for the given credentials.
    pub fn new(username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        let username = username.as_ref();
        let credentials = format!("{username}:{}", password.as_ref());
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        Self {
            username: Arc::from(username),
            encoded_credentials: Arc::from(encoded),
        }
    }
}

impl std::fmt::Debug for BasicAuthentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthentication")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl AuthenticationStrategy for BasicAuthentication {
    fn execute_authenticated(&self, request: ExecutableRequest) -> ResponseFuture<'_> {
        let request =
            request.with_header(AUTHORIZATION, format!("Basic {}", self.encoded_credentials));
        Box::pin(async move { reject_unauthorized(request.execute().await?, "basic") })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::{Method, Request, RequestExecutor};

    /// Echoes the Authorization header; answers 401 when it is absent or wrong.
    struct Gate {
        expected: &'static str,
    }

    impl RequestExecutor for Gate {
        fn send(&self, request: Request<Bytes>) -> ResponseFuture<'_> {
            let status = if request.header(AUTHORIZATION) == Some(self.expected) {
                200
            } else {
                401
            };
            let echoed = Bytes::from(request.header(AUTHORIZATION).unwrap_or_default().to_string());
            Box::pin(async move { Ok(Response::new(status, HashMap::new(), echoed)) })
        }
    }

    fn executable(expected: &'static str) -> ExecutableRequest {
        let url = url::Url::parse("https://api.example.com/me").expect("url");
        let request = Request::builder(Method::Get, url).build();
        ExecutableRequest::new(request, "Result", Arc::new(Gate { expected }))
    }

    #[tokio::test]
    async fn bearer_attaches_token() {
        let auth = BearerAuthentication::new("t0k3n");
        let response = auth
            .execute_authenticated(executable("Bearer t0k3n"))
            .await
            .expect("authorized");
        assert_eq!(response.body().as_ref(), b"Bearer t0k3n");
    }

    #[tokio::test]
    async fn basic_attaches_encoded_credentials() {
        let auth = BasicAuthentication::new("user", "pass");
        let response = auth
            .execute_authenticated(executable("Basic dXNlcjpwYXNz"))
            .await
            .expect("authorized");
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn configured_credentials_replace_caller_header() {
        let url = url::Url::parse("https://api.example.com/me").expect("url");
        let request = Request::builder(Method::Get, url)
            .header("authorization", "Bearer stale")
            .build();
        let executable = ExecutableRequest::new(
            request,
            "Result",
            Arc::new(Gate {
                expected: "Bearer fresh",
            }),
        );

        let response = BearerAuthentication::new("fresh")
            .execute_authenticated(executable)
            .await
            .expect("authorized");
        assert_eq!(response.body().as_ref(), b"Bearer fresh");
    }

    #[tokio::test]
    async fn unauthorized_becomes_authentication_error() {
        let auth = BearerAuthentication::new("expired");
        let err = auth
            .execute_authenticated(executable("Bearer fresh"))
            .await
            .expect_err("rejected");
        assert!(err.is_authentication());
        assert!(err.to_string().contains("401 Unauthorized"));
    }

    #[test]
    fn debug_hides_secrets() {
        let debug = format!("{:?}", BasicAuthentication::new("alice", "s3cret"));
        assert!(debug.contains("alice"));
        assert!(!debug.contains("s3cret"));
        assert!(!debug.contains("YWxpY2U6czNjcmV0"));
    }
}
