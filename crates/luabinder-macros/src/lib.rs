//! Proc macro generating Lua trampolines.
//!
//! Provides the `#[lua_function]` attribute. Re-exported by `luabinder`
//! behind its default `macros` feature; use it from there.
//!
//! # Example
//!
//! ```ignore
//! use luabinder::lua_function;
//!
//! #[lua_function]
//! fn add(a: i64, b: i64) -> i64 {
//!     a + b
//! }
//!
//! // `add` is unchanged; `add_lua` is its interpreter entry point.
//! ```
//!
//! The macro:
//! 1. Rejects signatures that can never be marshalled, on the offending span
//! 2. Emits `<name>_lua`, a trampoline specialized to the function
//! 3. Asserts `LuaArg` / `LuaReturn` for each type at its own span, so
//!    aliases and host types implementing the traits are accepted

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{parse_macro_input, punctuated::Punctuated, ItemFn, Meta, Token};

mod options;
mod signature;

use options::BindingOptions;
use signature::{NativeSignature, SlotKind};

/// Generate a Lua entry point next to a free function.
///
/// # Options
///
/// - `exact`: float parameters reject integer-represented numbers
/// - `lenient`: the default; float parameters accept any number
/// - `name = "ident"`: name of the generated entry point (default
///   `<fn name>_lua`)
///
/// # Example
///
/// ```ignore
/// #[lua_function(exact, name = "lua_scale")]
/// pub fn scale(x: f64, by: f64) -> f64 {
///     x * by
/// }
/// ```
#[proc_macro_attribute]
pub fn lua_function(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with Punctuated::<Meta, Token![,]>::parse_terminated);
    let func = parse_macro_input!(item as ItemFn);

    match lua_function_impl(args, func) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn lua_function_impl(args: Punctuated<Meta, Token![,]>, func: ItemFn) -> syn::Result<TokenStream2> {
    let options = BindingOptions::parse(args)?;
    let signature = NativeSignature::analyze(&func.sig)?;

    let fn_name = &func.sig.ident;
    let vis = &func.vis;
    let entry_name = options
        .name
        .clone()
        .unwrap_or_else(|| format_ident!("{}_lua", fn_name));
    let params = &signature.params;
    let arg_bounds = params.iter().map(|ty| {
        quote_spanned! {ty.span()=>
            let _ = <#ty as ::luabinder::LuaArg>::KIND;
        }
    });
    let return_bound = signature.return_type.as_ref().map(|ty| {
        quote_spanned! {ty.span()=>
            let _ = <#ty as ::luabinder::LuaReturn>::COUNT;
        }
    });
    let coercion = if options.exact {
        quote! { ::luabinder::Coercion::Exact }
    } else {
        quote! { ::luabinder::Coercion::Lenient }
    };
    let doc = format!(
        "Lua entry point for [`{}`]: `({}) -> {}`.",
        fn_name,
        signature
            .kinds
            .iter()
            .zip(params)
            .map(|(kind, ty)| kind_label(*kind, Some(ty)))
            .collect::<Vec<_>>()
            .join(", "),
        kind_label(signature.output, signature.return_type.as_ref())
    );

    Ok(quote! {
        #func

        #[doc = #doc]
        #vis fn #entry_name<__LuaState: ::luabinder::LuaState + ?Sized>(
            state: &mut __LuaState,
        ) -> ::std::os::raw::c_int {
            #(#arg_bounds)*
            #return_bound
            ::luabinder::dispatch::<__LuaState, _, (#(#params,)*)>(state, #fn_name, #coercion)
        }
    })
}

/// Kind name for generated docs; deferred types show their own spelling
fn kind_label(kind: SlotKind, ty: Option<&syn::Type>) -> String {
    match (kind, ty) {
        (SlotKind::Deferred, Some(ty)) => quote!(#ty).to_string().replace(' ', ""),
        _ => kind.name().to_string(),
    }
}
