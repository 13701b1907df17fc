//! Literal parsing helpers for derive attributes.

use syn::meta::ParseNestedMeta;
use syn::{LitBool, LitStr, Token};

/// Parses `key = "..."`, rejecting any other literal.
pub(crate) fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    let value = meta.value()?;
    value
        .parse::<LitStr>()
        .map_err(|err| syn::Error::new(err.span(), format!("{key} must be a string")))
}

/// Parses a marker that is either bare (`key`) or explicit (`key = true`).
pub(crate) fn flag(meta: &ParseNestedMeta, key: &str) -> syn::Result<bool> {
    if !meta.input.peek(Token![=]) {
        return Ok(true);
    }
    meta.value()?
        .parse::<LitBool>()
        .map(|lit| lit.value)
        .map_err(|err| syn::Error::new(err.span(), format!("{key} must be a boolean")))
}
