//! HTTP execution path: invocation to request, response to value.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{ContentType, ExecutableRequest, Request, Result, ServiceConfig, ServiceMethodInvocation};

/// Resolve the target URI of an invocation against `base_url`.
///
/// The expanded route template is appended to the base path and query pairs
/// are appended in binding order.
///
/// # Errors
///
/// Returns [`crate::Error::UriBuild`] if the template is malformed or a
/// placeholder has no bound variable.
///
/// # Example
///
/// ```
/// use restler_core::{
///     Argument, DefaultInvocationMapper, ExecutionStrategy, InvocationMapper, Method,
///     MethodDescription, ParamLocation, ParamMeta, build_uri,
/// };
///
/// static GET_USER: MethodDescription = MethodDescription {
///     name: "get_user",
///     http_method: Method::Get,
///     uri_template: "/users/{id}",
///     return_type: "User",
///     strategy: ExecutionStrategy::Direct,
///     params: &[
///         ParamMeta { name: "id", location: ParamLocation::Path, type_name: "u64", required: true },
///         ParamMeta { name: "verbose", location: ParamLocation::Query, type_name: "bool", required: true },
///     ],
/// };
///
/// let invocation = DefaultInvocationMapper
///     .map(&GET_USER, vec![Argument::value(&42), Argument::value(&true)])
///     .expect("mapped");
/// let base = url::Url::parse("https://api.example.com").expect("url");
///
/// let uri = build_uri(&base, &invocation).expect("uri");
/// assert_eq!(uri.as_str(), "https://api.example.com/users/42?verbose=true");
/// ```
pub fn build_uri(base_url: &Url, invocation: &ServiceMethodInvocation) -> Result<Url> {
    let route = invocation.uri_template().expand(invocation.path_variables())?;

    let mut path = base_url.path().trim_end_matches('/').to_string();
    if !route.starts_with('/') {
        path.push('/');
    }
    path.push_str(&route);

    let mut url = base_url.clone();
    url.set_path(&path);

    let query = invocation.query_params();
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(name, value)| (name, value)));
    }

    Ok(url)
}

/// Executes invocations over HTTP with the configured authentication.
#[derive(Debug, Clone)]
pub struct HttpInvocationExecutor {
    config: Arc<ServiceConfig>,
}

impl HttpInvocationExecutor {
    /// Creates an executor for the given service.
    #[must_use]
    pub const fn new(config: Arc<ServiceConfig>) -> Self {
        Self { config }
    }

    /// The service configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Build the executable request for an invocation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UriBuild`] if the target URI cannot be built.
    pub fn prepare(&self, invocation: ServiceMethodInvocation) -> Result<ExecutableRequest> {
        let url = build_uri(self.config.base_url(), &invocation)?;
        let method = invocation.method();

        let mut builder = Request::builder(method.http_method, url)
            .header("Accept", ContentType::Json.as_str())
            .header("User-Agent", self.config.user_agent());
        if invocation.body.is_some() {
            builder = builder.header("Content-Type", ContentType::Json.as_str());
        }
        let request = builder
            .headers(invocation.headers)
            .maybe_body(invocation.body)
            .build();

        Ok(ExecutableRequest::new(
            request,
            method.return_type,
            Arc::clone(self.config.executor()),
        ))
    }

    /// Send the invocation and decode the response into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UriBuild`] before sending if the URI cannot
    /// be built, the authentication or transport error if sending fails,
    /// [`crate::Error::Http`] for a non-2xx status and
    /// [`crate::Error::Decoding`] if the body does not match `T`.
    pub async fn execute<T: DeserializeOwned>(&self, invocation: ServiceMethodInvocation) -> Result<T> {
        let name = invocation.method().name;
        let request = self.prepare(invocation)?;
        debug!(method = name, http.method = %request.method(), url = %request.url(), "sending request");

        let response = self
            .config
            .authentication()
            .execute_authenticated(request)
            .await?;
        debug!(method = name, status = response.status(), "received response");

        response.error_for_status()?.json()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use bytes::Bytes;

    use super::*;
    use crate::{
        Argument, DefaultInvocationMapper, ExecutionStrategy, InvocationMapper, Method,
        MethodDescription, ParamLocation, ParamMeta, RequestExecutor, Response, ResponseFuture,
    };

    const fn param(name: &'static str, location: ParamLocation) -> ParamMeta {
        ParamMeta {
            name,
            location,
            type_name: "String",
            required: true,
        }
    }

    static GET_USER: MethodDescription = MethodDescription {
        name: "get_user",
        http_method: Method::Get,
        uri_template: "/users/{id}",
        return_type: "User",
        strategy: ExecutionStrategy::Direct,
        params: &[param("id", ParamLocation::Path), param("verbose", ParamLocation::Query)],
    };

    static CREATE: MethodDescription = MethodDescription {
        name: "create",
        http_method: Method::Post,
        uri_template: "users",
        return_type: "User",
        strategy: ExecutionStrategy::Direct,
        params: &[
            param("X-Tenant", ParamLocation::Header),
            param("user", ParamLocation::Body),
        ],
    };

    static EXPORT: MethodDescription = MethodDescription {
        name: "export",
        http_method: Method::Get,
        uri_template: "/export",
        return_type: "User",
        strategy: ExecutionStrategy::Direct,
        params: &[param("accept", ParamLocation::Header), param("USER-AGENT", ParamLocation::Header)],
    };

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct User {
        id: u64,
    }

    struct Canned {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<Request<Bytes>>>,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<Request<Bytes>> {
            self.seen.lock().expect("lock").clone()
        }
    }

    impl RequestExecutor for Canned {
        fn send(&self, request: Request<Bytes>) -> ResponseFuture<'_> {
            self.seen.lock().expect("lock").push(request);
            let response = Response::new(self.status, HashMap::new(), Bytes::from_static(self.body.as_bytes()));
            Box::pin(async move { Ok(response) })
        }
    }

    fn executor(base_url: &str, canned: &Arc<Canned>) -> HttpInvocationExecutor {
        let config = ServiceConfig::builder()
            .base_url(base_url)
            .shared_executor(canned.clone())
            .user_agent("test-agent")
            .build()
            .expect("config");
        HttpInvocationExecutor::new(Arc::new(config))
    }

    fn get_user(id: &str) -> ServiceMethodInvocation {
        DefaultInvocationMapper
            .map(&GET_USER, vec![Argument::value(id), Argument::value(&true)])
            .expect("mapped")
    }

    #[test]
    fn build_uri_appends_to_base_path() {
        let base = Url::parse("https://api.example.com/v1/").expect("url");
        let uri = build_uri(&base, &get_user("a/b")).expect("uri");
        assert_eq!(uri.as_str(), "https://api.example.com/v1/users/a%2Fb?verbose=true");
    }

    #[test]
    fn build_uri_without_query() {
        let base = Url::parse("https://api.example.com").expect("url");
        let invocation = ServiceMethodInvocation::new(&GET_USER, vec![]).path_variable("id", "7");
        let uri = build_uri(&base, &invocation).expect("uri");
        assert_eq!(uri.as_str(), "https://api.example.com/users/7");
    }

    #[test]
    fn build_uri_unresolved_variable() {
        let base = Url::parse("https://api.example.com").expect("url");
        let invocation = ServiceMethodInvocation::new(&GET_USER, vec![]);
        let err = build_uri(&base, &invocation).expect_err("id unbound");
        assert!(err.is_uri_build());
    }

    #[tokio::test]
    async fn execute_decodes_success() {
        let canned = Canned::new(200, r#"{"id":42}"#);
        let user: User = executor("https://api.example.com", &canned)
            .execute(get_user("42"))
            .await
            .expect("user");
        assert_eq!(user, User { id: 42 });

        let requests = canned.requests();
        assert_eq!(requests.len(), 1);
        let request = requests.first().expect("request");
        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.url().as_str(), "https://api.example.com/users/42?verbose=true");
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert_eq!(request.header("User-Agent"), Some("test-agent"));
        assert_eq!(request.header("Content-Type"), None);
    }

    #[tokio::test]
    async fn execute_sends_body_and_headers() {
        let canned = Canned::new(201, r#"{"id":1}"#);
        let invocation = DefaultInvocationMapper
            .map(
                &CREATE,
                vec![Argument::value("acme"), Argument::body(&serde_json::json!({"name": "x"}))],
            )
            .expect("mapped");

        let user: User = executor("https://api.example.com/api", &canned)
            .execute(invocation)
            .await
            .expect("user");
        assert_eq!(user.id, 1);

        let requests = canned.requests();
        let request = requests.first().expect("request");
        assert_eq!(request.url().as_str(), "https://api.example.com/api/users");
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.header("X-Tenant"), Some("acme"));
        assert_eq!(request.body().map(AsRef::as_ref), Some(br#"{"name":"x"}"#.as_slice()));
    }

    #[tokio::test]
    async fn invocation_headers_replace_defaults_in_any_case() {
        let canned = Canned::new(200, r#"{"id":3}"#);
        let invocation = DefaultInvocationMapper
            .map(&EXPORT, vec![Argument::value("text/csv"), Argument::value("exporter/1")])
            .expect("mapped");

        executor("https://api.example.com", &canned)
            .execute::<User>(invocation)
            .await
            .expect("user");

        let requests = canned.requests();
        let request = requests.first().expect("request");
        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.header("Accept"), Some("text/csv"));
        assert_eq!(request.header("User-Agent"), Some("exporter/1"));
    }

    #[tokio::test]
    async fn execute_maps_error_status() {
        let canned = Canned::new(404, r#"{"error":"no such user"}"#);
        let err = executor("https://api.example.com", &canned)
            .execute::<User>(get_user("1"))
            .await
            .expect_err("404");

        assert_eq!(err.status(), Some(404));
        assert!(err.body().is_some());
    }

    #[tokio::test]
    async fn execute_reports_decoding_path() {
        let canned = Canned::new(200, r#"{"id":"not a number"}"#);
        let err = executor("https://api.example.com", &canned)
            .execute::<User>(get_user("1"))
            .await
            .expect_err("bad payload");

        assert!(err.is_decoding());
        assert!(err.to_string().contains("id"));
    }

    #[tokio::test]
    async fn execute_fails_before_sending_on_bad_uri() {
        let canned = Canned::new(200, "{}");
        let invocation = ServiceMethodInvocation::new(&GET_USER, vec![]);
        let err = executor("https://api.example.com", &canned)
            .execute::<User>(invocation)
            .await
            .expect_err("unbound id");

        assert!(err.is_uri_build());
        assert!(canned.requests().is_empty());
    }
}
