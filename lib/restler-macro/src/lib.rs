//! Procedural macros for the restler client proxy generator.
//!
//! - `#[restler]` - turn an annotated trait into a service interface with a
//!   generated client
//! - `#[controller]`, `#[rest_controller]` - controller markers, placed below `#[restler]`
//!
//! Inside the trait, methods carry `#[get]`, `#[post]`, `#[put]`, `#[delete]`,
//! `#[patch]`, `#[head]`, `#[options]` or `#[http("VERB /path")]`, and
//! parameters `#[path]`, `#[query]`, `#[header("Name")]` or `#[body]`.
//!
//! # Example
//!
//! ```ignore
//! use restler::prelude::*;
//!
//! #[restler(path = "/api")]
//! #[rest_controller]
//! pub trait UserApi {
//!     #[get("/users/{id}")]
//!     async fn get_user(&self, id: u64) -> restler::Result<User>;
//!
//!     #[post("/users")]
//!     fn create_user(&self, user: &NewUser) -> DeferredResult<User>;
//!
//!     #[get("/users")]
//!     fn list_users(&self, #[query] page: Option<u32>) -> Callable<Vec<User>>;
//! }
//!
//! let users: UserApiClient = factory.produce_client()?;
//! let user = users.get_user(42).await?;
//! ```

mod attrs;
mod codegen;
mod expand;

use proc_macro::TokenStream;

/// Mark a trait as a restler service interface.
///
/// This macro generates:
/// - A clean trait (without restler attributes)
/// - A client struct implementing the trait (e.g., `UserApiClient`)
/// - A static table of `MethodDescription`s and the `ServiceInterface` impl
///
/// The execution strategy of each method follows its return type:
/// `DeferredResult<T>` is spawned on the worker pool, `Callable<T>` runs on
/// demand, and anything else is an `async fn` executed directly.
///
/// # Attributes
///
/// - `path` (optional): route prefix applied to every method
///
/// # Example
///
/// ```ignore
/// #[restler(path = "/api")]
/// #[rest_controller]
/// pub trait UserApi {
///     #[get("/users/{id}")]
///     async fn get_user(&self, id: u64) -> restler::Result<User>;
/// }
/// ```
#[proc_macro_attribute]
pub fn restler(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand::expand_restler_trait(attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Controller marker.
///
/// Read by `#[restler]`, so it must be placed below it.
#[proc_macro_attribute]
pub fn controller(_attr: TokenStream, item: TokenStream) -> TokenStream {
    misplaced_marker("controller", item)
}

/// REST controller marker.
///
/// Read by `#[restler]`, so it must be placed below it.
#[proc_macro_attribute]
pub fn rest_controller(_attr: TokenStream, item: TokenStream) -> TokenStream {
    misplaced_marker("rest_controller", item)
}

fn misplaced_marker(name: &str, item: TokenStream) -> TokenStream {
    let item = proc_macro2::TokenStream::from(item);
    let message = format!("#[{name}] must be placed below #[restler]");
    let error = syn::Error::new(proc_macro2::Span::call_site(), message).to_compile_error();
    quote::quote! {
        #error
        #item
    }
    .into()
}
