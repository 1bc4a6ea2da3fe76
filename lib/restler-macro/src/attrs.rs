//! Attribute parsing for restler proc-macros.

use restler_core::{ControllerMarker, Method, ParamLocation};
use syn::{Ident, Type};

/// Parameter attribute names stripped from the generated trait.
pub(crate) const PARAM_ATTRS: &[&str] = &["path", "query", "header", "body"];

/// Controller marker attribute names.
pub(crate) const MARKER_ATTRS: &[&str] = &["controller", "rest_controller"];

/// Arguments of `#[restler(...)]`.
#[derive(Debug, Default)]
pub(crate) struct RestlerArgs {
    /// Route prefix applied to every method.
    pub(crate) path: Option<String>,
}

impl RestlerArgs {
    /// Join the prefix and a method route.
    #[must_use]
    pub(crate) fn route(&self, path: &str) -> String {
        match self.path.as_deref() {
            Some(prefix) if !prefix.is_empty() => {
                let prefix = prefix.trim_end_matches('/');
                if path.is_empty() || path.starts_with('/') {
                    format!("{prefix}{path}")
                } else {
                    format!("{prefix}/{path}")
                }
            }
            _ => path.to_string(),
        }
    }
}

/// Parse the `#[restler]` attribute arguments.
pub(crate) fn parse_restler_args(attr: proc_macro2::TokenStream) -> syn::Result<RestlerArgs> {
    let mut args = RestlerArgs::default();

    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("path") {
            let value: syn::LitStr = meta.value()?.parse()?;
            args.path = Some(value.value());
            Ok(())
        } else {
            Err(meta.error("unsupported restler attribute, expected `path = \"/prefix\"`"))
        }
    });

    syn::parse::Parser::parse2(parser, attr)?;
    Ok(args)
}

/// Find the controller marker among the trait attributes.
pub(crate) fn find_marker(attrs: &[syn::Attribute]) -> Option<ControllerMarker> {
    attrs.iter().find_map(|attr| {
        let path = attr.path();
        if path.is_ident("rest_controller") {
            Some(ControllerMarker::RestController)
        } else if path.is_ident("controller") {
            Some(ControllerMarker::Controller)
        } else {
            None
        }
    })
}

/// Parameter kind for method arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParamKind {
    /// Path variable (e.g., `#[path]` or `#[path("user_id")]`).
    Path(Option<String>),
    /// Query parameter (e.g., `#[query]` or `#[query("page_size")]`).
    Query(Option<String>),
    /// Header parameter (e.g., `#[header("X-Request-Id")]`).
    Header(String),
    /// JSON body (e.g., `#[body]`).
    Body,
}

impl ParamKind {
    /// Runtime location of the parameter.
    pub(crate) const fn location(&self) -> ParamLocation {
        match self {
            Self::Path(_) => ParamLocation::Path,
            Self::Query(_) => ParamLocation::Query,
            Self::Header(_) => ParamLocation::Header,
            Self::Body => ParamLocation::Body,
        }
    }
}

/// A parsed method parameter.
#[derive(Debug)]
pub(crate) struct MethodParam {
    /// Parameter name from the function signature.
    pub(crate) name: Ident,
    /// Parameter type.
    pub(crate) ty: Type,
    /// Parameter kind (path, query, header, body).
    pub(crate) kind: ParamKind,
}

impl MethodParam {
    /// Name the argument is bound under.
    pub(crate) fn binding(&self) -> String {
        match &self.kind {
            ParamKind::Path(Some(alias)) | ParamKind::Query(Some(alias)) => alias.clone(),
            ParamKind::Header(name) => name.clone(),
            ParamKind::Path(None) | ParamKind::Query(None) | ParamKind::Body => {
                self.name.to_string()
            }
        }
    }
}

/// Parse a parameter attribute and return its kind.
pub(crate) fn parse_param_attr(attr: &syn::Attribute) -> syn::Result<Option<ParamKind>> {
    let path = attr.path();

    if path.is_ident("path") {
        return parse_optional_string_arg(attr).map(|name| Some(ParamKind::Path(name)));
    }

    if path.is_ident("query") {
        return parse_optional_string_arg(attr).map(|name| Some(ParamKind::Query(name)));
    }

    if path.is_ident("header") {
        let name = parse_optional_string_arg(attr)?.ok_or_else(|| {
            syn::Error::new_spanned(attr, "expected header name: #[header(\"X-Name\")]")
        })?;
        return Ok(Some(ParamKind::Header(name)));
    }

    if path.is_ident("body") {
        return Ok(Some(ParamKind::Body));
    }

    Ok(None)
}

/// Parse an optional string argument from an attribute.
fn parse_optional_string_arg(attr: &syn::Attribute) -> syn::Result<Option<String>> {
    match &attr.meta {
        syn::Meta::List(meta_list) => {
            let str_lit: syn::LitStr = syn::parse2(meta_list.tokens.clone())?;
            Ok(Some(str_lit.value()))
        }
        syn::Meta::Path(_) => Ok(None),
        syn::Meta::NameValue(_) => Err(syn::Error::new_spanned(attr, "expected string argument")),
    }
}

/// Find and parse the HTTP method attribute of a trait method.
pub(crate) fn find_http_attribute(attrs: &[syn::Attribute]) -> syn::Result<Option<(Method, String)>> {
    for attr in attrs {
        let path = attr.path();

        let method = Method::ALL.into_iter().find(|method| {
            path.is_ident(&method.to_string().to_lowercase())
        });

        if let Some(method) = method {
            let route = parse_attr_path(attr)?;
            return Ok(Some((method, route)));
        }

        // #[http("METHOD /path")]
        if path.is_ident("http") {
            let declared = parse_attr_path(attr)?;
            let (method_str, route) = declared.split_once(' ').ok_or_else(|| {
                syn::Error::new_spanned(
                    attr,
                    "expected format: \"METHOD /path\" (e.g., \"GET /users/{id}\")",
                )
            })?;

            let method = method_str.parse::<Method>().map_err(|_| {
                syn::Error::new_spanned(
                    attr,
                    format!(
                        "unsupported HTTP method: {method_str}. Supported: GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS"
                    ),
                )
            })?;

            return Ok(Some((method, route.trim().to_string())));
        }
    }

    Ok(None)
}

/// Parse the path string from an attribute.
fn parse_attr_path(attr: &syn::Attribute) -> syn::Result<String> {
    match &attr.meta {
        syn::Meta::List(meta_list) => {
            let str_lit: syn::LitStr = syn::parse2(meta_list.tokens.clone())?;
            Ok(str_lit.value())
        }
        _ => Err(syn::Error::new_spanned(attr, "expected string argument")),
    }
}
