//! Concrete HTTP requests handed to a [`crate::RequestExecutor`].
//!
//! Header names are case-insensitive: they are stored lowercased, so setting
//! `accept` after `Accept` replaces the earlier value.
//!
//! # Example
//!
//! ```
//! use restler_core::{Method, Request};
//! use bytes::Bytes;
//!
//! let url = url::Url::parse("https://api.example.com/users").expect("valid URL");
//! let request = Request::<Bytes>::builder(Method::Get, url)
//!     .header("Accept", "application/json")
//!     .header("accept", "text/plain")
//!     .build();
//!
//! assert_eq!(request.header("ACCEPT"), Some("text/plain"));
//! assert_eq!(request.headers().len(), 1);
//! ```

use std::collections::HashMap;

use bytes::Bytes;

use crate::Method;

/// Header map keyed by lowercased name.
pub type Headers = HashMap<String, String>;

pub(crate) fn normalize_headers(headers: impl IntoIterator<Item = (String, String)>) -> Headers {
    headers
        .into_iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value))
        .collect()
}

/// A buffered HTTP request.
#[derive(Debug, Clone)]
pub struct Request<B = Bytes> {
    method: Method,
    url: url::Url,
    headers: Headers,
    body: Option<B>,
}

impl<B> Request<B> {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder<B> {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Headers, names lowercased.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Header value by name, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Set a header, replacing any value stored under the same name in any case.
    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, Headers, Option<B>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for [`Request`].
#[derive(Debug, Clone)]
pub struct RequestBuilder<B = Bytes> {
    request: Request<B>,
}

impl<B> RequestBuilder<B> {
    /// Creates a builder without headers or body.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            request: Request {
                method,
                url,
                headers: Headers::new(),
                body: None,
            },
        }
    }

    /// Sets a header; later calls win regardless of name case.
    #[must_use]
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.request.set_header(name, value);
        self
    }

    /// Sets every header of `headers` in order.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        for (name, value) in headers {
            self.request.set_header(name, value);
        }
        self
    }

    /// Sets or clears the body.
    #[must_use]
    pub fn maybe_body(mut self, body: Option<B>) -> Self {
        self.request.body = body;
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(self, body: B) -> Self {
        self.maybe_body(Some(body))
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request<B> {
        self.request
    }
}

impl RequestBuilder<Bytes> {
    /// Serialize `value` as the JSON body and set `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: serde::Serialize + ?Sized>(self, value: &T) -> crate::Result<Self> {
        let body = crate::to_json(value)?;
        Ok(self
            .header("Content-Type", crate::ContentType::Json.as_str())
            .body(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> url::Url {
        url::Url::parse("https://api.example.com/users").expect("valid URL")
    }

    #[test]
    fn builder_without_body() {
        let request = Request::<Bytes>::builder(Method::Get, users())
            .header("Accept", "application/json")
            .build();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.url().as_str(), "https://api.example.com/users");
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert!(request.body().is_none());
    }

    #[test]
    fn header_names_ignore_case() {
        let mut request = Request::<Bytes>::builder(Method::Get, users())
            .header("Accept", "application/json")
            .headers([("ACCEPT".to_string(), "text/plain".to_string())])
            .build();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("accept"), Some("text/plain"));

        request.set_header("Authorization", "Bearer a");
        request.set_header("authorization", "Bearer b");
        assert_eq!(request.header("AUTHORIZATION"), Some("Bearer b"));
        assert_eq!(request.headers().len(), 2);
    }

    #[test]
    fn maybe_body_clears() {
        let request = Request::builder(Method::Post, users())
            .body(Bytes::from_static(b"x"))
            .maybe_body(None)
            .build();
        assert!(request.body().is_none());
    }

    #[test]
    fn json_sets_content_type() {
        #[derive(serde::Serialize)]
        struct User {
            name: String,
        }

        let request = Request::builder(Method::Post, users())
            .json(&User {
                name: "test".to_string(),
            })
            .expect("json")
            .build();

        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(
            request.body().map(AsRef::as_ref),
            Some(br#"{"name":"test"}"#.as_slice())
        );
    }
}
