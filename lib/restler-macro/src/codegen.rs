//! Code generation for restler proc-macros.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use restler_core::{ExecutionStrategy, Method, ParamLocation, select_strategy};
use syn::{Ident, Type, Visibility};

use crate::attrs::{MethodParam, ParamKind};

/// Strategy and descriptor data derived from a method's return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReturnInfo {
    /// Outer type constructor name, e.g. `DeferredResult`, `Result`.
    pub(crate) constructor: String,
    /// Strategy selected for the constructor.
    pub(crate) strategy: ExecutionStrategy,
}

/// Analyze the return type to select the execution strategy.
///
/// The last path segment of the declared type is looked up in the built-in
/// strategy table; `-> ()` and elided return types are named `()`.
pub(crate) fn analyze_return_type(return_type: &syn::ReturnType) -> ReturnInfo {
    let constructor = match return_type {
        syn::ReturnType::Default => "()".to_string(),
        syn::ReturnType::Type(_, ty) => type_constructor(ty),
    };
    let strategy = select_strategy(&constructor);
    ReturnInfo {
        constructor,
        strategy,
    }
}

/// Name of the outermost type constructor.
fn type_constructor(ty: &Type) -> String {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map_or_else(|| type_to_string(ty), |segment| segment.ident.to_string()),
        Type::Tuple(tuple) if tuple.elems.is_empty() => "()".to_string(),
        Type::Paren(paren) => type_constructor(&paren.elem),
        Type::Group(group) => type_constructor(&group.elem),
        _ => type_to_string(ty),
    }
}

/// Check that the function shape matches its strategy.
pub(crate) fn check_signature(sig: &syn::Signature, info: &ReturnInfo) -> syn::Result<()> {
    match (info.strategy, sig.asyncness.is_some()) {
        (ExecutionStrategy::Direct, true) => Ok(()),
        (ExecutionStrategy::Direct, false) => Err(syn::Error::new_spanned(
            &sig.fn_token,
            format!(
                "method `{}` returns `{}` and executes directly: declare it `async fn ... -> restler::Result<T>`, \
                 or return `DeferredResult<T>` / `Callable<T>`",
                sig.ident, info.constructor
            ),
        )),
        (ExecutionStrategy::Deferred | ExecutionStrategy::Lazy, true) => {
            Err(syn::Error::new_spanned(
                sig.asyncness,
                format!(
                    "method `{}` returns `{}` ({} execution) and must not be async",
                    sig.ident, info.constructor, info.strategy
                ),
            ))
        }
        (ExecutionStrategy::Deferred | ExecutionStrategy::Lazy, false) => Ok(()),
    }
}

/// Generate the expression converting one parameter into a `restler::Argument`.
pub(crate) fn generate_argument(param: &MethodParam) -> TokenStream {
    let name = &param.name;
    match &param.kind {
        ParamKind::Body if is_option_type(&param.ty) => quote! {
            #name.as_ref().map_or(::restler::Argument::Absent, |body| ::restler::Argument::body(body))
        },
        ParamKind::Body => quote! { ::restler::Argument::body(&#name) },
        _ if is_option_type(&param.ty) => quote! { ::restler::Argument::optional(#name.as_ref()) },
        _ if is_collection_type(&param.ty) => quote! { ::restler::Argument::values(#name.iter()) },
        _ => quote! { ::restler::Argument::value(&#name) },
    }
}

/// Generate the `restler::MethodDescription` literal for a method.
pub(crate) fn generate_description(
    method_name: &str,
    http_method: Method,
    uri_template: &str,
    info: &ReturnInfo,
    params: &[MethodParam],
) -> TokenStream {
    let method_ident = format_ident!("{}", format!("{http_method:?}"));
    let strategy_ident = format_ident!("{}", format!("{:?}", info.strategy));
    let return_type = &info.constructor;

    let param_metas: Vec<_> = params
        .iter()
        .map(|p| {
            let name = p.binding();
            let location = location_tokens(p.kind.location());
            let type_name = type_to_string(&p.ty);
            let required = !is_option_type(&p.ty);
            quote! {
                ::restler::ParamMeta {
                    name: #name,
                    location: #location,
                    type_name: #type_name,
                    required: #required,
                }
            }
        })
        .collect();

    quote! {
        ::restler::MethodDescription {
            name: #method_name,
            http_method: ::restler::Method::#method_ident,
            uri_template: #uri_template,
            return_type: #return_type,
            strategy: ::restler::ExecutionStrategy::#strategy_ident,
            params: &[#(#param_metas),*],
        }
    }
}

/// Convert a `ParamLocation` to tokens.
fn location_tokens(location: ParamLocation) -> TokenStream {
    match location {
        ParamLocation::Path => quote! { ::restler::ParamLocation::Path },
        ParamLocation::Query => quote! { ::restler::ParamLocation::Query },
        ParamLocation::Header => quote! { ::restler::ParamLocation::Header },
        ParamLocation::Body => quote! { ::restler::ParamLocation::Body },
    }
}

/// Generate the body of a client method: build arguments, then dispatch.
pub(crate) fn generate_method_body(
    table: &Ident,
    index: usize,
    strategy: ExecutionStrategy,
    params: &[MethodParam],
) -> TokenStream {
    let arguments: Vec<_> = params.iter().map(generate_argument).collect();
    let args = quote! { ::std::vec![#(#arguments),*] };

    match strategy {
        ExecutionStrategy::Direct => quote! {
            self.dispatcher.direct(&#table[#index], #args).await
        },
        ExecutionStrategy::Deferred => quote! {
            self.dispatcher.deferred(&#table[#index], #args)
        },
        ExecutionStrategy::Lazy => quote! {
            self.dispatcher.callable(&#table[#index], #args)
        },
    }
}

/// Generate the client struct wrapping a dispatcher.
pub(crate) fn generate_client_struct(
    vis: &Visibility,
    trait_name: &Ident,
    client_name: &Ident,
) -> TokenStream {
    let doc = format!(" Generated client implementing [`{trait_name}`].");
    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone)]
        #vis struct #client_name {
            dispatcher: ::restler::Dispatcher,
        }

        impl #client_name {
            /// The dispatcher every call is routed through.
            #[must_use]
            pub fn dispatcher(&self) -> &::restler::Dispatcher {
                &self.dispatcher
            }
        }
    }
}

/// Convert a `syn::Type` to a string representation.
pub(crate) fn type_to_string(ty: &Type) -> String {
    quote!(#ty).to_string().replace(' ', "")
}

/// Check if a type is `Option<T>`.
pub(crate) fn is_option_type(ty: &Type) -> bool {
    matches!(ty, Type::Path(type_path) if type_path.path.segments.last().is_some_and(|seg| seg.ident == "Option"))
}

/// Check if a type is a collection bound as repeated values: `Vec<T>`,
/// `[T]`, or a reference to either.
pub(crate) fn is_collection_type(ty: &Type) -> bool {
    match ty {
        Type::Reference(type_ref) => is_collection_type(&type_ref.elem),
        Type::Slice(_) | Type::Array(_) => true,
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|seg| seg.ident == "Vec"),
        _ => false,
    }
}
