//! Compile-time classification of native signatures
//!
//! Maps parameter and return types onto the kind set the runtime supports.
//! Shapes that can never be marshalled (borrows, tuples, slices) are
//! rejected here with a span on the offending type. Named types outside
//! the built-in set, aliases included, are deferred: the generated entry
//! point asserts `LuaArg` / `LuaReturn` for them at the type's span.

use syn::spanned::Spanned;
use syn::{FnArg, ReturnType, Signature, Type};

/// Largest parameter list the runtime has tuple impls for.
pub const MAX_ARITY: usize = 12;

/// Marshalling kind of a parameter or return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Boolean,
    Integer,
    Float,
    String,
    /// `&str`, return position only
    StaticStr,
    /// Raw pointers and `LightUserData`
    Opaque,
    /// `()`, return position only
    Unit,
    /// Any other named type, resolved by trait bounds
    Deferred,
}

impl SlotKind {
    /// Resolve a type name (last path segment)
    pub fn from_type_name(ident: &str) -> Option<Self> {
        match ident {
            "bool" => Some(Self::Boolean),
            "i64" | "i32" => Some(Self::Integer),
            "f64" | "f32" => Some(Self::Float),
            "String" => Some(Self::String),
            "LightUserData" => Some(Self::Opaque),
            _ => None,
        }
    }

    /// Resolve a full type
    pub fn from_syn_type(ty: &Type) -> Option<Self> {
        match ty {
            Type::Path(type_path) => {
                let builtin = match (&type_path.qself, type_path.path.segments.last()) {
                    (None, Some(segment)) if segment.arguments.is_empty() => {
                        Self::from_type_name(&segment.ident.to_string())
                    }
                    _ => None,
                };
                Some(builtin.unwrap_or(Self::Deferred))
            }
            Type::Ptr(_) => Some(Self::Opaque),
            Type::Tuple(tuple) if tuple.elems.is_empty() => Some(Self::Unit),
            Type::Reference(reference) if reference.mutability.is_none() => {
                match &*reference.elem {
                    Type::Path(inner) if inner.path.is_ident("str") => Some(Self::StaticStr),
                    _ => None,
                }
            }
            Type::Paren(inner) => Self::from_syn_type(&inner.elem),
            Type::Group(inner) => Self::from_syn_type(&inner.elem),
            _ => None,
        }
    }

    /// Kind name as shown in generated docs
    pub fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String | Self::StaticStr => "string",
            Self::Opaque => "userdata",
            Self::Unit => "()",
            Self::Deferred => "native",
        }
    }

    fn is_param(self) -> bool {
        !matches!(self, Self::StaticStr | Self::Unit)
    }
}

/// A validated native signature.
#[derive(Debug)]
pub struct NativeSignature {
    /// Parameter types, left to right
    pub params: Vec<Type>,
    /// Parameter kinds, parallel to `params`
    pub kinds: Vec<SlotKind>,
    /// Return kind
    pub output: SlotKind,
    /// Declared return type, `None` for `()`
    pub return_type: Option<Type>,
}

impl NativeSignature {
    /// Validate `sig` for binding.
    pub fn analyze(sig: &Signature) -> syn::Result<Self> {
        if let Some(token) = &sig.asyncness {
            return Err(syn::Error::new_spanned(token, "async functions cannot be bound to Lua"));
        }
        if let Some(token) = &sig.unsafety {
            return Err(syn::Error::new_spanned(
                token,
                "unsafe functions cannot be bound to Lua; wrap the call in a safe function",
            ));
        }
        if let Some(variadic) = &sig.variadic {
            return Err(syn::Error::new_spanned(variadic, "variadic functions cannot be bound to Lua"));
        }
        if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
            return Err(syn::Error::new_spanned(
                &sig.generics,
                "generic functions cannot be bound to Lua",
            ));
        }
        if sig.inputs.len() > MAX_ARITY {
            return Err(syn::Error::new(
                sig.inputs.span(),
                format!("at most {} parameters can be bound, found {}", MAX_ARITY, sig.inputs.len()),
            ));
        }

        let mut params = Vec::with_capacity(sig.inputs.len());
        let mut kinds = Vec::with_capacity(sig.inputs.len());
        for input in &sig.inputs {
            match input {
                FnArg::Receiver(receiver) => {
                    return Err(syn::Error::new_spanned(
                        receiver,
                        "methods cannot be bound to Lua; only free functions",
                    ));
                }
                FnArg::Typed(pat_type) => {
                    let kind = SlotKind::from_syn_type(&pat_type.ty)
                        .filter(|kind| kind.is_param())
                        .ok_or_else(|| unsupported(&pat_type.ty, "parameter"))?;
                    params.push((*pat_type.ty).clone());
                    kinds.push(kind);
                }
            }
        }

        let (output, return_type) = match &sig.output {
            ReturnType::Default => (SlotKind::Unit, None),
            ReturnType::Type(_, ty) => {
                let kind = SlotKind::from_syn_type(ty).ok_or_else(|| unsupported(ty, "return"))?;
                (kind, Some((**ty).clone()))
            }
        };

        Ok(Self {
            params,
            kinds,
            output,
            return_type,
        })
    }
}

fn unsupported(ty: &Type, position: &str) -> syn::Error {
    let hint = match ty {
        Type::Tuple(_) if position == "return" => " (multiple return values are not supported)",
        Type::Reference(_) if position == "parameter" => " (take `String` instead of a borrow)",
        _ => "",
    };
    syn::Error::new_spanned(
        ty,
        format!(
            "unsupported {} type: expected a named type implementing `{}` or a raw pointer{}",
            position,
            if position == "return" { "LuaReturn" } else { "LuaArg" },
            hint
        ),
    )
}
