//! Macro expansion logic for restler.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use restler_core::{Method, placeholders};
use syn::{FnArg, Ident, ItemTrait, Pat, TraitItem, TraitItemFn, parse2};

use crate::attrs::{
    MARKER_ATTRS, MethodParam, PARAM_ATTRS, ParamKind, RestlerArgs, find_http_attribute,
    find_marker, parse_param_attr, parse_restler_args,
};
use crate::codegen::{
    ReturnInfo, analyze_return_type, check_signature, generate_client_struct,
    generate_description, generate_method_body,
};

/// Information about a parsed trait method.
pub(crate) struct TraitMethodInfo {
    /// The method signature.
    pub(crate) sig: syn::Signature,
    /// The HTTP method (GET, POST, etc.).
    pub(crate) http_method: Method,
    /// The route template, prefix included.
    pub(crate) route: String,
    /// Parsed parameters.
    pub(crate) params: Vec<MethodParam>,
    /// Return type analysis.
    pub(crate) returns: ReturnInfo,
    /// Documentation attributes.
    pub(crate) docs: Vec<syn::Attribute>,
}

/// Expand the `#[restler]` attribute on a trait.
pub(crate) fn expand_restler_trait(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let trait_def: ItemTrait = parse2(item)?;
    let args = parse_restler_args(attr)?;

    if !trait_def.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &trait_def.generics,
            "restler service interfaces cannot be generic",
        ));
    }

    let trait_name = &trait_def.ident;
    let vis = &trait_def.vis;
    let client_name = format_ident!("{}Client", trait_name);
    let table = format_ident!("__RESTLER_METHODS_{}", trait_name);

    let methods = extract_trait_methods(&trait_def, &args)?;
    let clean_trait = generate_clean_trait(&trait_def, &methods);
    let client_struct = generate_client_struct(vis, trait_name, &client_name);

    let count = methods.len();
    let descriptions = methods.iter().map(|m| {
        generate_description(
            &m.sig.ident.to_string(),
            m.http_method,
            &m.route,
            &m.returns,
            &m.params,
        )
    });

    let name = trait_name.to_string();
    let marker = match find_marker(&trait_def.attrs) {
        Some(restler_core::ControllerMarker::Controller) => {
            quote! { ::core::option::Option::Some(::restler::ControllerMarker::Controller) }
        }
        Some(restler_core::ControllerMarker::RestController) => {
            quote! { ::core::option::Option::Some(::restler::ControllerMarker::RestController) }
        }
        None => quote! { ::core::option::Option::None },
    };

    let method_impls = methods.iter().enumerate().map(|(index, m)| {
        let sig = strip_restler_attrs_from_sig(&m.sig);
        let body = generate_method_body(&table, index, m.returns.strategy, &m.params);
        quote! {
            #sig {
                #body
            }
        }
    });

    Ok(quote! {
        #clean_trait

        #client_struct

        #[doc(hidden)]
        #[allow(non_upper_case_globals)]
        static #table: [::restler::MethodDescription; #count] = [#(#descriptions),*];

        impl ::restler::ServiceInterface for #client_name {
            const NAME: &'static str = #name;
            const MARKER: ::core::option::Option<::restler::ControllerMarker> = #marker;

            fn methods() -> &'static [::restler::MethodDescription] {
                &#table
            }

            fn from_dispatcher(dispatcher: ::restler::Dispatcher) -> Self {
                Self { dispatcher }
            }
        }

        impl #trait_name for #client_name {
            #(#method_impls)*
        }
    })
}

/// Extract methods from a trait definition.
fn extract_trait_methods(trait_def: &ItemTrait, args: &RestlerArgs) -> syn::Result<Vec<TraitMethodInfo>> {
    let mut methods = Vec::new();

    for item in &trait_def.items {
        let TraitItem::Fn(method) = item else {
            return Err(syn::Error::new_spanned(
                item,
                "restler service interfaces may only declare methods",
            ));
        };

        let Some((http_method, path)) = find_http_attribute(&method.attrs)? else {
            return Err(syn::Error::new_spanned(
                &method.sig,
                "missing HTTP method attribute: #[get(\"/path\")], #[post(\"/path\")], ... or #[http(\"VERB /path\")]",
            ));
        };

        if method.default.is_some() {
            return Err(syn::Error::new_spanned(
                &method.sig.ident,
                "remote methods cannot have a default body",
            ));
        }
        if !matches!(method.sig.inputs.first(), Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() && receiver.mutability.is_none())
        {
            return Err(syn::Error::new_spanned(
                &method.sig,
                "remote methods must take `&self`",
            ));
        }

        let route = args.route(&path);
        let params = parse_trait_method_params(method, &route, http_method)?;
        let returns = analyze_return_type(&method.sig.output);
        check_signature(&method.sig, &returns)?;

        let docs = method
            .attrs
            .iter()
            .filter(|a| a.path().is_ident("doc"))
            .cloned()
            .collect();

        methods.push(TraitMethodInfo {
            sig: method.sig.clone(),
            http_method,
            route,
            params,
            returns,
            docs,
        });
    }

    Ok(methods)
}

/// Parse method parameters from a trait method.
///
/// Parameters are classified as follows:
/// 1. Explicit attributes (`#[path]`, `#[query]`, `#[header]`, `#[body]`) take precedence
/// 2. Parameters matching route placeholders are auto-classified as Path
/// 3. For body-supporting methods (POST, PUT, PATCH), a single remaining param becomes Body
/// 4. Multiple unclassified params or unclassified params on non-body methods cause errors
///
/// Every placeholder must be bound by exactly one path parameter.
fn parse_trait_method_params(
    method: &TraitItemFn,
    route: &str,
    http_method: Method,
) -> syn::Result<Vec<MethodParam>> {
    let placeholders = placeholders(route)
        .map_err(|err| syn::Error::new_spanned(&method.sig.ident, err.to_string()))?;
    let mut params = Vec::new();
    let mut unclassified: Vec<(Ident, syn::Type, &syn::PatType)> = Vec::new();

    for input in &method.sig.inputs {
        let FnArg::Typed(pat_type) = input else {
            continue;
        };

        let name = match pat_type.pat.as_ref() {
            Pat::Ident(pat_ident) => pat_ident.ident.clone(),
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "remote method parameters must be plain identifiers",
                ));
            }
        };
        let ty = (*pat_type.ty).clone();

        let mut kinds = Vec::new();
        for attr in &pat_type.attrs {
            if let Some(kind) = parse_param_attr(attr)? {
                kinds.push(kind);
            }
        }
        if kinds.len() > 1 {
            return Err(syn::Error::new_spanned(
                pat_type,
                format!("parameter '{name}' has more than one binding attribute"),
            ));
        }
        if let Some(kind) = kinds.pop() {
            params.push(MethodParam { name, ty, kind });
            continue;
        }

        if placeholders.contains(&name.to_string().as_str()) {
            params.push(MethodParam {
                name,
                ty,
                kind: ParamKind::Path(None),
            });
            continue;
        }

        unclassified.push((name, ty, pat_type));
    }

    match unclassified.len() {
        0 => {}
        1 if http_method.supports_body() => {
            if let Some((name, ty, _)) = unclassified.into_iter().next() {
                params.push(MethodParam {
                    name,
                    ty,
                    kind: ParamKind::Body,
                });
            }
        }
        1 => {
            if let Some((name, _, pat_type)) = unclassified.first() {
                return Err(syn::Error::new_spanned(
                    pat_type,
                    format!(
                        "parameter '{name}' does not match any route placeholder (available: {placeholders:?}) \
                         and {http_method} requests do not support body. \
                         Add #[query] or another explicit attribute."
                    ),
                ));
            }
        }
        _ => {
            let names: Vec<_> = unclassified.iter().map(|(n, _, _)| n.to_string()).collect();
            if let Some((_, _, pat_type)) = unclassified.get(1) {
                return Err(syn::Error::new_spanned(
                    pat_type,
                    format!(
                        "multiple unattributed parameters found: {names:?}. \
                         Only one body parameter is allowed. \
                         Add explicit attributes to disambiguate.",
                    ),
                ));
            }
        }
    }

    check_bindings(method, &placeholders, &params)?;
    Ok(params)
}

/// Path parameters and placeholders must match one to one; at most one body.
fn check_bindings(method: &TraitItemFn, placeholders: &[&str], params: &[MethodParam]) -> syn::Result<()> {
    let mut bound = Vec::new();
    for param in params {
        match &param.kind {
            ParamKind::Path(_) => {
                let binding = param.binding();
                if !placeholders.contains(&binding.as_str()) {
                    return Err(syn::Error::new_spanned(
                        &param.name,
                        format!("path parameter `{binding}` has no `{{{binding}}}` placeholder in the route"),
                    ));
                }
                if bound.contains(&binding) {
                    return Err(syn::Error::new_spanned(
                        &param.name,
                        format!("placeholder `{{{binding}}}` is bound more than once"),
                    ));
                }
                bound.push(binding);
            }
            ParamKind::Body => {
                if params.iter().filter(|p| p.kind == ParamKind::Body).count() > 1 {
                    return Err(syn::Error::new_spanned(
                        &param.name,
                        "only one body parameter is allowed",
                    ));
                }
            }
            ParamKind::Query(_) | ParamKind::Header(_) => {}
        }
    }

    if let Some(missing) = placeholders
        .iter()
        .find(|name| !bound.iter().any(|b| b == *name))
    {
        return Err(syn::Error::new_spanned(
            &method.sig.ident,
            format!("placeholder `{{{missing}}}` is not bound by any parameter"),
        ));
    }

    Ok(())
}

/// Generate a clean trait without restler-specific attributes.
fn generate_clean_trait(original: &ItemTrait, methods: &[TraitMethodInfo]) -> TokenStream {
    let vis = &original.vis;
    let name = &original.ident;
    let supertraits = &original.supertraits;
    let colon = original.colon_token;

    let trait_attrs: Vec<_> = original
        .attrs
        .iter()
        .filter(|a| !MARKER_ATTRS.iter().any(|marker| a.path().is_ident(marker)))
        .collect();

    let method_signatures: Vec<_> = methods
        .iter()
        .map(|m| {
            let docs = &m.docs;
            let sig = strip_restler_attrs_from_sig(&m.sig);
            quote! {
                #(#docs)*
                #sig;
            }
        })
        .collect();

    quote! {
        #(#trait_attrs)*
        #[allow(async_fn_in_trait)]
        #vis trait #name #colon #supertraits {
            #(#method_signatures)*
        }
    }
}

/// Check if an attribute is a restler parameter attribute.
fn is_restler_param_attr(attr: &syn::Attribute) -> bool {
    let path = attr.path();
    PARAM_ATTRS.iter().any(|name| path.is_ident(name))
}

/// Strip restler-specific attributes from a method signature.
fn strip_restler_attrs_from_sig(sig: &syn::Signature) -> syn::Signature {
    let mut clean_sig = sig.clone();
    for arg in &mut clean_sig.inputs {
        if let FnArg::Typed(pat_type) = arg {
            pat_type.attrs.retain(|attr| !is_restler_param_attr(attr));
        }
    }
    clean_sig
}
