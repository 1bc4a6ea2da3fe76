//! Per-call invocation data.

use std::collections::BTreeMap;
use std::fmt::Display;

use bytes::Bytes;

use crate::{MethodDescription, UriTemplate};

/// One argument of an intercepted call, converted at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// `None` for an optional parameter.
    Absent,
    /// A single value, rendered with `Display`.
    Value(String),
    /// A collection of values, bound as repeated query pairs.
    Values(Vec<String>),
    /// A request body already serialized as JSON.
    Body(Bytes),
    /// A body that failed to serialize.
    Invalid(String),
}

impl Argument {
    /// A single displayable value.
    pub fn value<T: Display + ?Sized>(value: &T) -> Self {
        Self::Value(value.to_string())
    }

    /// An optional value; `None` becomes [`Argument::Absent`].
    pub fn optional<T: Display>(value: Option<T>) -> Self {
        value.map_or(Self::Absent, |v| Self::Value(v.to_string()))
    }

    /// A collection of displayable values.
    pub fn values<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        Self::Values(values.into_iter().map(|v| v.to_string()).collect())
    }

    /// A JSON request body.
    pub fn body<T: serde::Serialize + ?Sized>(value: &T) -> Self {
        match crate::to_json(value) {
            Ok(bytes) => Self::Body(bytes),
            Err(err) => Self::Invalid(err.to_string()),
        }
    }

    /// Whether the argument carries nothing.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// A single logical call on a generated client, ready for execution.
///
/// Created by an [`crate::InvocationMapper`] and consumed by the execution path.
#[derive(Debug, Clone)]
pub struct ServiceMethodInvocation {
    pub(crate) method: &'static MethodDescription,
    pub(crate) path_variables: BTreeMap<String, String>,
    pub(crate) query_params: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<Bytes>,
    pub(crate) args: Vec<Argument>,
}

impl ServiceMethodInvocation {
    /// Creates an invocation with no bindings yet.
    #[must_use]
    pub fn new(method: &'static MethodDescription, args: Vec<Argument>) -> Self {
        Self {
            method,
            path_variables: BTreeMap::new(),
            query_params: Vec::new(),
            headers: Vec::new(),
            body: None,
            args,
        }
    }

    /// Binds a path variable.
    #[must_use]
    pub fn path_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_variables.insert(name.into(), value.into());
        self
    }

    /// Appends a query pair; a name may repeat.
    #[must_use]
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    /// Appends a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the serialized request body.
    #[must_use]
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    /// The invoked method's description.
    #[must_use]
    pub const fn method(&self) -> &'static MethodDescription {
        self.method
    }

    /// Declared return type name.
    #[must_use]
    pub const fn return_type(&self) -> &'static str {
        self.method.return_type
    }

    /// Route template.
    #[must_use]
    pub const fn uri_template(&self) -> UriTemplate {
        self.method.template()
    }

    /// Bound path variables.
    #[must_use]
    pub const fn path_variables(&self) -> &BTreeMap<String, String> {
        &self.path_variables
    }

    /// Query pairs, in binding order.
    #[must_use]
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    /// Header pairs, in binding order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Serialized request body.
    #[must_use]
    pub const fn request_body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Arguments as supplied by the caller.
    #[must_use]
    pub fn args(&self) -> &[Argument] {
        &self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExecutionStrategy, Method};

    static LIST: MethodDescription = MethodDescription {
        name: "list",
        http_method: Method::Get,
        uri_template: "/items",
        return_type: "Vec",
        strategy: ExecutionStrategy::Direct,
        params: &[],
    };

    #[test]
    fn argument_constructors() {
        assert_eq!(Argument::value(&42), Argument::Value("42".to_string()));
        assert_eq!(Argument::value("abc"), Argument::Value("abc".to_string()));
        assert_eq!(Argument::optional(None::<u32>), Argument::Absent);
        assert_eq!(Argument::optional(Some(true)), Argument::Value("true".to_string()));
        assert_eq!(
            Argument::values(["a", "b"]),
            Argument::Values(vec!["a".to_string(), "b".to_string()])
        );
        assert!(Argument::Absent.is_absent());
    }

    #[test]
    fn argument_body() {
        #[derive(serde::Serialize)]
        struct Item {
            name: &'static str,
        }

        assert_eq!(
            Argument::body(&Item { name: "x" }),
            Argument::Body(Bytes::from_static(br#"{"name":"x"}"#))
        );

        let mut bad = std::collections::HashMap::new();
        bad.insert(vec![1u8], 1);
        assert!(matches!(Argument::body(&bad), Argument::Invalid(_)));
    }

    #[test]
    fn invocation_builder() {
        let invocation = ServiceMethodInvocation::new(&LIST, vec![])
            .query_param("tag", "a")
            .query_param("tag", "b")
            .header("X-Trace", "1")
            .body(Bytes::from_static(b"{}"));

        assert_eq!(invocation.method().name, "list");
        assert_eq!(invocation.return_type(), "Vec");
        assert_eq!(invocation.uri_template().as_str(), "/items");
        assert_eq!(invocation.query_params().len(), 2);
        assert_eq!(invocation.headers(), [("X-Trace".to_string(), "1".to_string())]);
        assert!(invocation.request_body().is_some());
        assert!(invocation.path_variables().is_empty());
    }
}
