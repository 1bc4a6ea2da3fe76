//! Static route and binding metadata generated for each remote method.

use std::fmt;

use crate::{ExecutionStrategy, Method, UriTemplate};

/// Parameter location in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    /// Path variable (e.g., `/users/{id}`)
    Path,
    /// Query parameter (e.g., `?limit=10`)
    Query,
    /// Header parameter
    Header,
    /// Request body (JSON)
    Body,
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Header => write!(f, "header"),
            Self::Body => write!(f, "body"),
        }
    }
}

/// Metadata about a single declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamMeta {
    /// Binding name: the placeholder, query key or header name.
    pub name: &'static str,
    /// Where the argument is sent in the HTTP request.
    pub location: ParamLocation,
    /// The Rust type name (e.g., "u64", "Option<String>").
    pub type_name: &'static str,
    /// Whether the parameter is required (not an Option type).
    pub required: bool,
}

/// Marker a service interface must carry to be turned into a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerMarker {
    /// `#[controller]`
    Controller,
    /// `#[rest_controller]`
    RestController,
}

/// Everything known statically about one remote method.
///
/// Tables of descriptions are emitted by `#[restler]` and live for the whole
/// program; invocations borrow them as `&'static MethodDescription`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodDescription {
    /// Method name as declared on the interface.
    pub name: &'static str,
    /// HTTP verb.
    pub http_method: Method,
    /// Route template, including any interface-level prefix.
    pub uri_template: &'static str,
    /// Outer constructor of the declared return type (e.g., "Result", "DeferredResult").
    pub return_type: &'static str,
    /// Strategy selected from the return type.
    pub strategy: ExecutionStrategy,
    /// Declared parameters, in call order.
    pub params: &'static [ParamMeta],
}

impl MethodDescription {
    /// The route template.
    #[must_use]
    pub const fn template(&self) -> UriTemplate {
        UriTemplate::new(self.uri_template)
    }

    /// Parameters bound at the given location.
    pub fn params_at(&self, location: ParamLocation) -> impl Iterator<Item = &'static ParamMeta> {
        self.params.iter().filter(move |p| p.location == location)
    }

    /// Whether a parameter is bound as the request body.
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.params.iter().any(|p| p.location == ParamLocation::Body)
    }
}

impl fmt::Display for MethodDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.http_method, self.uri_template)
    }
}
