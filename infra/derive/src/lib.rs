#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every GeoPost crate: error enums, API models and
//! handlers, feature slices and the runtime entry point.
//!
//! Examples below are `ignore`d because they need the consuming crates
//! (`thiserror`, `serde`, `utoipa`, `geopost-kernel`, `geopost-runtime`) in scope.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Turns an `async fn main` into a blocking `main` running on the server's
/// multi-threaded Tokio runtime.
///
/// Takes an optional `worker_threads = <n>` to pin the worker count.
///
/// # Example
///
/// ```rust,ignore
/// #[geopost_runtime::main]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Declares a DTO exchanged over the HTTP API.
///
/// Adds `Debug`, `Serialize` and `Deserialize` when missing, derives
/// `utoipa::ToSchema` when the calling crate's `server` feature is on, and
/// applies the serde policy: `rename_all = "snake_case"` and
/// `deny_unknown_fields`, both overridable.
///
/// # Example
///
/// ```rust,ignore
/// #[api_model(deny_unknown_fields = false)]
/// pub struct AddressInput {
///     pub street: String,
///     pub postal_code: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Marks an Axum handler and forwards its arguments to `utoipa::path`.
///
/// The `utoipa::path` attribute is only emitted when the calling crate's
/// `server` feature is enabled, so handler modules compile without `utoipa`.
///
/// # Example
///
/// ```rust,ignore
/// #[api_handler(get, path = "/health", responses((status = OK, body = HealthResponse)))]
/// pub async fn health_handler() -> Json<HealthResponse> {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Builds a domain error enum on top of `thiserror`.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` when not already derived.
/// * `<Name>Ext` trait adding `.context(...)` to `Result<T, Name>` and to
///   `Result<T, Source>` for every variant that wraps a source error.
/// * `From<Source>` for those variants, so `?` works on upstream errors.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper for `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must use named fields. A variant wrapping a source (a field named
/// `source` or marked `#[source]`/`#[from]`) must also declare
/// `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// #[geopost_error]
/// pub enum DatabaseError {
///     #[error("SurrealDB error{}: {source}", format_context(.context))]
///     Surreal { source: surrealdb::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal database error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn geopost_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Declares a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` wraps it in an `Arc`,
/// derefs to it and implements `FeatureSlice` so it can be registered in the
/// server state.
///
/// # Example
/// ```rust,ignore
/// #[geopost_derive::geopost_slice]
/// pub struct Addresses {
///     pub repository: AddressRepository,
/// }
///
/// let slice = Addresses::new(AddressesInner { repository });
/// ```
#[proc_macro_attribute]
pub fn geopost_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
