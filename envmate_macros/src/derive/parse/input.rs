//! Input parsing for the `EnvMarshal` derive macro.
//!
//! This module classifies the deriving type and gathers its attribute
//! metadata in one pass so expansion can fail fast with useful errors.

use heck::ToShoutySnakeCase;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields};

use super::{FieldAttrs, TypeAttrs, parse_field_attrs, parse_type_attrs};

/// How the deriving type is laid out in the store.
pub(crate) enum Shape {
    /// Named fields (or none), each stored under its own key.
    Record(Vec<RecordField>),
    /// A single-field tuple struct stored as its inner value.
    Newtype(Box<syn::Type>),
    /// One entry produced by the type's `TextCodec` implementation.
    Text,
}

/// One named field of a record.
pub(crate) struct RecordField {
    pub ident: syn::Ident,
    pub attrs: FieldAttrs,
}

impl RecordField {
    /// Key segment the field is stored under.
    pub(crate) fn env_name(&self) -> String {
        self.attrs
            .rename
            .clone()
            .unwrap_or_else(|| self.ident.unraw().to_string().to_shouty_snake_case())
    }
}

/// Everything generation needs to know about the deriving type.
pub(crate) struct ParsedInput {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub attrs: TypeAttrs,
    pub shape: Shape,
}

/// Classifies `input` and parses its attributes.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<ParsedInput> {
    let attrs = parse_type_attrs(&input.attrs)?;
    let shape = if attrs.text {
        if let Data::Union(data) = &input.data {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "EnvMarshal cannot be derived for unions",
            ));
        }
        Shape::Text
    } else {
        structural_shape(input)?
    };
    Ok(ParsedInput {
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        attrs,
        shape,
    })
}

fn structural_shape(input: &DeriveInput) -> syn::Result<Shape> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named
                .named
                .iter()
                .map(|field| {
                    Ok(RecordField {
                        ident: field.ident.clone().ok_or_else(|| {
                            syn::Error::new_spanned(field, "named field without an identifier")
                        })?,
                        attrs: parse_field_attrs(&field.attrs)?,
                    })
                })
                .collect::<syn::Result<Vec<_>>>()
                .map(Shape::Record),
            Fields::Unit => Ok(Shape::Record(Vec::new())),
            Fields::Unnamed(unnamed) => {
                let mut fields = unnamed.unnamed.iter();
                match (fields.next(), fields.next()) {
                    (Some(inner), None) => {
                        if inner.attrs.iter().any(|a| a.path().is_ident("envmate")) {
                            return Err(syn::Error::new_spanned(
                                inner,
                                "envmate field attributes are not supported on newtype structs",
                            ));
                        }
                        Ok(Shape::Newtype(Box::new(inner.ty.clone())))
                    }
                    _ => Err(syn::Error::new_spanned(
                        &data.fields,
                        "tuple structs need exactly one field, or #[envmate(text)]",
                    )),
                }
            }
        },
        Data::Enum(data) => Err(syn::Error::new_spanned(
            data.enum_token,
            "enums need #[envmate(text)] and a TextCodec implementation",
        )),
        Data::Union(data) => Err(syn::Error::new_spanned(
            data.union_token,
            "EnvMarshal cannot be derived for unions",
        )),
    }
}
