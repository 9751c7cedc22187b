use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, Expr, ExprLit, ItemFn, Lit, MetaNameValue, ReturnType, Type};

/// Expands `#[geopost_runtime::main]` into a blocking `main` that builds the
/// server runtime and blocks on the original body.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if input.sig.asyncness.is_none() {
        return Error::new_spanned(
            &input.sig.ident,
            "#[geopost_runtime::main] can only be used on async functions",
        )
        .to_compile_error();
    }

    if !returns_result(&input.sig.output) {
        return Error::new_spanned(
            &input.sig.output,
            "#[geopost_runtime::main] requires a Result return type",
        )
        .to_compile_error();
    }

    let config = match runtime_config(args) {
        Ok(config) => config,
        Err(err) => return err,
    };

    let ItemFn { attrs, vis, sig, block } = input;
    let name = &sig.ident;
    let output = &sig.output;

    quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let rt = #config.build()?;
            rt.block_on(async #block)
        }
    }
}

fn runtime_config(args: TokenStream) -> Result<TokenStream, TokenStream> {
    let base = quote! { ::geopost_runtime::RuntimeConfig::new() };
    if args.is_empty() {
        return Ok(base);
    }

    let arg: MetaNameValue = syn::parse2(args).map_err(|err| err.to_compile_error())?;
    if !arg.path.is_ident("worker_threads") {
        return Err(Error::new_spanned(&arg.path, "expected `worker_threads = <n>`")
            .to_compile_error());
    }
    let Expr::Lit(ExprLit { lit: Lit::Int(threads), .. }) = &arg.value else {
        return Err(Error::new_spanned(&arg.value, "worker_threads must be an integer literal")
            .to_compile_error());
    };

    Ok(quote! { #base.worker_threads(#threads) })
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = &**ty else {
        return false;
    };
    path.path.segments.last().is_some_and(|seg| seg.ident == "Result")
}
