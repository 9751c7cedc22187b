use super::derived_trait_names;
use fxhash::FxHashSet;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ItemFn, ItemStruct, Lit, LitStr, Meta, MetaNameValue, Token};

/// Wire naming used by every DTO unless overridden.
const DEFAULT_RENAME: &str = "snake_case";

/// Expands `#[api_model]`: serde derives, `ToSchema` behind the `server` feature,
/// and the workspace serde policy.
pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    let expanded = ApiModelArgs::parse(args).and_then(|args| {
        let derives = derived_trait_names(&input.attrs);
        let existing = SerdePolicy::read(&input.attrs)?;

        let derive_attr = missing_derives(&derives);
        let schema_attr = schema_attr(&derives);
        let rename_attr = rename_attr(args.rename_all, &existing)?;
        let deny_attr = deny_unknown_attr(args.deny_unknown_fields, &existing, &input)?;

        Ok(quote! {
            #derive_attr
            #schema_attr
            #rename_attr
            #deny_attr
            #input
        })
    });

    expanded.unwrap_or_else(|err| err)
}

/// Expands `#[api_handler]`: forwards the arguments to `utoipa::path` when the
/// `server` feature of the calling crate is enabled.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}

#[derive(Default)]
struct ApiModelArgs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: Option<bool>,
}

impl ApiModelArgs {
    fn parse(args: TokenStream) -> Result<Self, TokenStream> {
        let metas = Punctuated::<Meta, Token![,]>::parse_terminated
            .parse2(args)
            .map_err(|err| err.to_compile_error())?;

        let mut parsed = Self::default();
        for meta in metas {
            let pair = match meta {
                Meta::NameValue(pair) => pair,
                other => return Err(spanned_error(&other, "expected `name = value` arguments")),
            };

            if pair.path.is_ident("rename_all") {
                let value = string_literal(&pair)?;
                parsed.rename_all = Some(only_once(parsed.rename_all, &pair, value)?);
            } else if pair.path.is_ident("deny_unknown_fields") {
                let value = bool_literal(&pair)?;
                parsed.deny_unknown_fields =
                    Some(only_once(parsed.deny_unknown_fields, &pair, value)?);
            } else {
                return Err(spanned_error(
                    &pair.path,
                    "unsupported argument; expected rename_all or deny_unknown_fields",
                ));
            }
        }

        Ok(parsed)
    }
}

/// Serde container attributes already written by hand on the struct.
struct SerdePolicy {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

impl SerdePolicy {
    fn read(attrs: &[Attribute]) -> Result<Self, TokenStream> {
        let mut policy = Self { rename_all: None, deny_unknown_fields: false };

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    policy.rename_all = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("deny_unknown_fields") {
                    policy.deny_unknown_fields = true;
                }
                Ok(())
            })
            .map_err(|err| err.to_compile_error())?;
        }

        Ok(policy)
    }
}

fn missing_derives(derives: &FxHashSet<String>) -> TokenStream {
    let mut tokens = Vec::new();
    if !derives.contains("Debug") {
        tokens.push(quote! { Debug });
    }
    if !derives.contains("Serialize") {
        tokens.push(quote! { ::serde::Serialize });
    }
    if !derives.contains("Deserialize") {
        tokens.push(quote! { ::serde::Deserialize });
    }

    if tokens.is_empty() { quote! {} } else { quote! { #[derive(#(#tokens),*)] } }
}

fn schema_attr(derives: &FxHashSet<String>) -> TokenStream {
    if derives.contains("ToSchema") {
        quote! {}
    } else {
        quote! { #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))] }
    }
}

fn rename_attr(
    requested: Option<LitStr>,
    existing: &SerdePolicy,
) -> Result<TokenStream, TokenStream> {
    let requested = requested.unwrap_or_else(|| LitStr::new(DEFAULT_RENAME, Span::call_site()));

    match &existing.rename_all {
        Some(found) if found.value() != requested.value() => Err(spanned_error(
            found,
            "conflicting serde rename_all; drop it or pass the same value to api_model",
        )),
        Some(_) => Ok(quote! {}),
        None => Ok(quote! { #[serde(rename_all = #requested)] }),
    }
}

fn deny_unknown_attr(
    requested: Option<bool>,
    existing: &SerdePolicy,
    input: &ItemStruct,
) -> Result<TokenStream, TokenStream> {
    let deny = requested.unwrap_or(true);

    match (existing.deny_unknown_fields, deny) {
        (true, false) => Err(spanned_error(
            &input.ident,
            "deny_unknown_fields is already set via serde; remove it before disabling",
        )),
        (true, true) | (false, false) => Ok(quote! {}),
        (false, true) => Ok(quote! { #[serde(deny_unknown_fields)] }),
    }
}

fn string_literal(pair: &MetaNameValue) -> Result<LitStr, TokenStream> {
    match &pair.value {
        Expr::Lit(expr) => match &expr.lit {
            Lit::Str(lit) => Ok(lit.clone()),
            _ => Err(spanned_error(&pair.value, "expected a string literal")),
        },
        _ => Err(spanned_error(&pair.value, "expected a string literal")),
    }
}

fn bool_literal(pair: &MetaNameValue) -> Result<bool, TokenStream> {
    match &pair.value {
        Expr::Lit(expr) => match &expr.lit {
            Lit::Bool(lit) => Ok(lit.value),
            _ => Err(spanned_error(&pair.value, "expected a boolean literal")),
        },
        _ => Err(spanned_error(&pair.value, "expected a boolean literal")),
    }
}

fn only_once<T>(current: Option<T>, pair: &MetaNameValue, value: T) -> Result<T, TokenStream> {
    if current.is_some() {
        return Err(spanned_error(pair, "duplicate argument"));
    }
    Ok(value)
}

fn spanned_error(tokens: impl quote::ToTokens, message: &str) -> TokenStream {
    syn::Error::new_spanned(tokens, message).to_compile_error()
}
