//! Error types for restler.

use derive_more::{Display, Error, From};

/// Main error type for restler operations.
///
/// Variants follow the stage that raised them: client generation
/// ([`Error::InvalidTarget`]), invocation mapping ([`Error::Mapping`]),
/// URI building ([`Error::UriBuild`]), the authentication and transport
/// wrappers, and response decoding ([`Error::Decoding`]).
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// A client was requested for a type without a controller marker.
    #[display("invalid target `{interface}`: {reason}")]
    #[from(skip)]
    InvalidTarget {
        /// Name of the requested interface.
        #[error(not(source))]
        interface: String,
        /// Why the type was rejected.
        reason: String,
    },

    /// Arguments could not be bound to the method's declared parameters.
    #[display("cannot map `{method}`: {message}")]
    #[from(skip)]
    Mapping {
        /// Name of the invoked method.
        #[error(not(source))]
        method: String,
        /// Error message.
        message: String,
    },

    /// The target URI could not be built from the route template.
    #[display("cannot build URI from `{template}`: {message}")]
    #[from(skip)]
    UriBuild {
        /// The route template.
        #[error(not(source))]
        template: String,
        /// Error message.
        message: String,
    },

    /// The authentication strategy rejected or failed the request.
    #[display("authentication error: {_0}")]
    #[from(skip)]
    Authentication(#[error(not(source))] String),

    /// HTTP-level errors (non-2xx status codes).
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Response body, if available.
        #[error(not(source))]
        body: Option<bytes::Bytes>,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The transport could not turn the request into a wire request.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// The response body does not match the declared return type.
    #[display("cannot decode response at '{path}': {message}")]
    #[from(skip)]
    Decoding {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// The configured base URL cannot be parsed.
    #[display("invalid base URL: {_0}")]
    #[from]
    InvalidBaseUrl(url::ParseError),

    /// Inconsistent or incomplete configuration.
    #[display("configuration error: {_0}")]
    #[from(skip)]
    Configuration(#[error(not(source))] String),

    /// A deferred invocation was dropped by its worker before completing.
    #[display("deferred invocation abandoned before completion")]
    #[from(skip)]
    Abandoned,
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid target error.
    #[must_use]
    pub fn invalid_target(interface: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            interface: interface.into(),
            reason: reason.into(),
        }
    }

    /// Create a mapping error for the given method.
    #[must_use]
    pub fn mapping(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Mapping {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Create a URI build error for the given template.
    #[must_use]
    pub fn uri_build(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UriBuild {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Create an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Create an HTTP error from status code and message.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create an HTTP error with body.
    #[must_use]
    pub fn http_with_body(status: u16, message: impl Into<String>, body: bytes::Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a decoding error with path context.
    #[must_use]
    pub fn decoding(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decoding {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns `true` if this is an invalid target error.
    #[must_use]
    pub const fn is_invalid_target(&self) -> bool {
        matches!(self, Self::InvalidTarget { .. })
    }

    /// Returns `true` if this is a mapping error.
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping { .. })
    }

    /// Returns `true` if this is a URI build error.
    #[must_use]
    pub const fn is_uri_build(&self) -> bool {
        matches!(self, Self::UriBuild { .. })
    }

    /// Returns `true` if this is an authentication error.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Returns `true` if this is a decoding error.
    #[must_use]
    pub const fn is_decoding(&self) -> bool {
        matches!(self, Self::Decoding { .. })
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the transport failed before a response was received.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Tls(_) | Self::Timeout | Self::InvalidRequest(_)
        )
    }

    /// Returns the HTTP status code if this is an HTTP error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns the response body if this is an HTTP error with a body.
    #[must_use]
    pub fn body(&self) -> Option<&bytes::Bytes> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Try to decode the HTTP error body as JSON.
    ///
    /// Returns `None` if there is no body or this is not an HTTP error.
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.body().map(|body| crate::from_json(body))
    }
}
