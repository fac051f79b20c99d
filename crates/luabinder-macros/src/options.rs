//! `#[lua_function(...)]` attribute arguments

use syn::punctuated::Punctuated;
use syn::{Expr, Ident, Lit, Meta, Token};

/// Parsed attribute arguments.
#[derive(Debug, Default)]
pub struct BindingOptions {
    /// Float parameters reject integer-represented numbers
    pub exact: bool,
    /// Override for the generated entry point's name
    pub name: Option<Ident>,
}

impl BindingOptions {
    /// Accepts `exact`, `lenient` and `name = "ident"`.
    pub fn parse(args: Punctuated<Meta, Token![,]>) -> syn::Result<Self> {
        let mut options = Self::default();
        for meta in args {
            match &meta {
                Meta::Path(path) if path.is_ident("exact") => options.exact = true,
                Meta::Path(path) if path.is_ident("lenient") => options.exact = false,
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    let Expr::Lit(expr) = &nv.value else {
                        return Err(syn::Error::new_spanned(&nv.value, "expected a string literal"));
                    };
                    let Lit::Str(lit) = &expr.lit else {
                        return Err(syn::Error::new_spanned(&expr.lit, "expected a string literal"));
                    };
                    options.name = Some(lit.parse::<Ident>()?);
                }
                _ => {
                    return Err(syn::Error::new_spanned(
                        &meta,
                        "unknown option: expected `exact`, `lenient` or `name = \"...\"`",
                    ));
                }
            }
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse::Parser;

    fn parse(tokens: proc_macro2::TokenStream) -> syn::Result<BindingOptions> {
        let args = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(tokens)?;
        BindingOptions::parse(args)
    }

    #[test]
    fn test_defaults() {
        let options = parse(quote::quote! {}).expect("empty options");
        assert!(!options.exact);
        assert!(options.name.is_none());
    }

    #[test]
    fn test_exact_and_name() {
        let options = parse(quote::quote! { exact, name = "lua_add" }).expect("valid options");
        assert!(options.exact);
        assert_eq!(options.name.map(|i| i.to_string()).as_deref(), Some("lua_add"));
    }

    #[test]
    fn test_unknown_option() {
        let err = parse(quote::quote! { strict }).unwrap_err();
        assert!(err.to_string().contains("unknown option"));
    }

    #[test]
    fn test_name_must_be_ident() {
        assert!(parse(quote::quote! { name = "not an ident" }).is_err());
        assert!(parse(quote::quote! { name = 3 }).is_err());
    }
}
