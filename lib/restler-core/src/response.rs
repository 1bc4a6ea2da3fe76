//! Buffered HTTP responses returned by a [`crate::RequestExecutor`].

use std::collections::HashMap;

use bytes::Bytes;

use crate::request::{Headers, normalize_headers};

/// A fully read HTTP response.
///
/// Header names are lowercased on construction, so [`Response::header`]
/// ignores case.
#[derive(Debug, Clone)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: Headers,
    body: B,
}

impl<B> Response<B> {
    /// Creates a response from its status, headers and body.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers: normalize_headers(headers),
            body,
        }
    }

    /// Status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
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

    /// Body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into the body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.status, 400..=499)
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self.status, 500..=599)
    }

    /// Canonical reason phrase for the status, or an empty string.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        http::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("")
    }
}

impl Response<Bytes> {
    /// Decode the body as JSON into the declared return type.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Decoding`] if the body does not match `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        crate::from_json(&self.body)
    }

    /// Turn a non-2xx response into [`crate::Error::Http`], keeping the body.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Http`] when the status is not 2xx.
    pub fn error_for_status(self) -> crate::Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let message = self.reason();
        Err(crate::Error::http_with_body(self.status, message, self.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty(status: u16) -> Response {
        Response::new(status, HashMap::new(), Bytes::new())
    }

    #[test]
    fn headers_ignore_case() {
        let headers = HashMap::from([("Content-Type".to_string(), "application/json".to_string())]);
        let response = Response::new(200, headers, Bytes::from(r#"{"id":1}"#));

        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/json"));
        assert!(response.headers().contains_key("content-type"));
    }

    #[test]
    fn status_classes() {
        assert!(empty(204).is_success());
        assert!(!empty(301).is_success());
        assert!(empty(404).is_client_error());
        assert!(empty(503).is_server_error());
        assert_eq!(empty(418).reason(), "I'm a teapot");
        assert_eq!(empty(599).reason(), "");
    }

    #[test]
    fn json_decodes_body() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct User {
            id: u64,
            name: String,
        }

        let body = Bytes::from(r#"{"id":1,"name":"test"}"#);
        let user: User = Response::new(200, HashMap::new(), body)
            .json()
            .expect("deserialize");
        assert_eq!(
            user,
            User {
                id: 1,
                name: "test".to_string()
            }
        );
    }

    #[test]
    fn error_for_status_keeps_body() {
        assert!(empty(204).error_for_status().is_ok());

        let response = Response::new(404, HashMap::new(), Bytes::from("missing"));
        let err = response.error_for_status().expect_err("404 is an error");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "HTTP error 404: Not Found");
        assert_eq!(err.body().map(AsRef::as_ref), Some(b"missing".as_slice()));
    }
}
