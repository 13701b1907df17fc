//! Parsing of `#[envmate(...)]` attributes and the derive input's shape.
//!
//! Unknown keys are rejected so that a misspelt `flatten` or `rename` fails
//! the build instead of silently changing the stored keys.

use syn::Attribute;
use syn::meta::ParseNestedMeta;

mod input;
mod literals;

pub(crate) use input::{ParsedInput, RecordField, Shape, parse_input};
use literals::{flag, lit_str};

/// Type-level attributes recognised by `#[derive(EnvMarshal)]`.
#[derive(Default, Clone)]
pub(crate) struct TypeAttrs {
    /// The type stores itself through its `TextCodec` implementation.
    pub text: bool,
    /// The type implements `SetDefaults`.
    pub defaults: bool,
    /// The type implements `Initialize`.
    pub initialize: bool,
    /// Overrides the runtime crate path for dependency aliasing.
    pub crate_path: Option<syn::Path>,
}

/// Field-level attributes recognised by `#[derive(EnvMarshal)]`.
#[derive(Default, Clone)]
pub(crate) struct FieldAttrs {
    pub rename: Option<String>,
    pub skip: bool,
    pub flatten: bool,
}

/// Iterate all `#[envmate(...)]` attributes once and apply a callback.
fn parse_envmate<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("envmate")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

fn unknown(meta: &ParseNestedMeta, scope: &str) -> syn::Error {
    let name = meta
        .path
        .get_ident()
        .map_or_else(|| "<path>".to_owned(), ToString::to_string);
    meta.error(format!("unknown envmate {scope} attribute `{name}`"))
}

/// Extracts `#[envmate(...)]` metadata applied to the deriving type.
pub(crate) fn parse_type_attrs(attrs: &[Attribute]) -> syn::Result<TypeAttrs> {
    let mut out = TypeAttrs::default();
    parse_envmate(attrs, |meta| {
        match meta.path.get_ident().map(ToString::to_string).as_deref() {
            Some("text") => out.text = flag(meta, "text")?,
            Some("defaults") => out.defaults = flag(meta, "defaults")?,
            Some("initialize") => out.initialize = flag(meta, "initialize")?,
            Some("crate") => {
                let s = lit_str(meta, "crate")?;
                let path: syn::Path =
                    syn::parse_str(&s.value()).map_err(|e| syn::Error::new(s.span(), e))?;
                out.crate_path = Some(path);
            }
            _ => return Err(unknown(meta, "type")),
        }
        Ok(())
    })?;
    Ok(out)
}

/// Extracts `#[envmate(...)]` metadata applied to a record field.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_envmate(attrs, |meta| {
        match meta.path.get_ident().map(ToString::to_string).as_deref() {
            Some("rename") => {
                let s = lit_str(meta, "rename")?;
                let name = s.value();
                if name.is_empty() {
                    return Err(syn::Error::new(s.span(), "rename must not be empty"));
                }
                out.rename = Some(name);
            }
            Some("skip") => out.skip = flag(meta, "skip")?,
            Some("flatten") => out.flatten = flag(meta, "flatten")?,
            _ => return Err(unknown(meta, "field")),
        }
        Ok(())
    })?;
    Ok(out)
}
