//! Code generation for `#[derive(EnvMarshal)]`.
//!
//! Every shape produces a single `EnvMarshal` impl. Records expand to one
//! `field` call per member carrying a `Field` descriptor; the runtime decides
//! from the member type whether a flattened member actually squashes.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{GenericParam, Generics, parse_quote};

use super::parse::{ParsedInput, RecordField, Shape};

#[cfg(test)]
mod tests;

/// Generates the `EnvMarshal` impl for a parsed input.
pub(crate) fn marshal_impl(input: &ParsedInput, krate: &TokenStream) -> TokenStream {
    let ident = &input.ident;
    let generics = match input.shape {
        Shape::Text => text_generics(&input.generics, krate),
        Shape::Record(_) | Shape::Newtype(_) => bounded_generics(&input.generics, krate),
    };
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let defaults = input
        .attrs
        .defaults
        .then(|| quote! { #krate::apply_defaults(self)?; });
    let body = match &input.shape {
        Shape::Record(fields) => record_body(fields, defaults.as_ref(), krate),
        Shape::Newtype(inner) => newtype_body(inner, defaults.as_ref(), krate),
        Shape::Text => text_body(defaults.as_ref(), krate),
    };
    let initialize_self = initialize_self(input, krate);
    quote! {
        #[automatically_derived]
        impl #impl_generics #krate::EnvMarshal for #ident #ty_generics #where_clause {
            #body
            #initialize_self
        }
    }
}

/// Adds `T: EnvMarshal` for every type parameter.
fn bounded_generics(generics: &Generics, krate: &TokenStream) -> Generics {
    let mut bounded = generics.clone();
    for param in &mut bounded.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(#krate::EnvMarshal));
        }
    }
    bounded
}

/// Generic text types need their own `TextCodec` impl to be in scope.
fn text_generics(generics: &Generics, krate: &TokenStream) -> Generics {
    let mut bounded = generics.clone();
    if bounded.type_params().next().is_some() {
        bounded
            .make_where_clause()
            .predicates
            .push(parse_quote!(Self: #krate::TextCodec));
    }
    bounded
}

fn field_descriptor(field: &RecordField, krate: &TokenStream) -> TokenStream {
    let name = field.env_name();
    let renamed = field.attrs.rename.is_some().then(|| quote! { .renamed() });
    let flatten = field.attrs.flatten.then(|| quote! { .flatten() });
    quote! { #krate::Field::new(#name) #renamed #flatten }
}

fn record_body(
    fields: &[RecordField],
    defaults: Option<&TokenStream>,
    krate: &TokenStream,
) -> TokenStream {
    let active: Vec<&RecordField> = fields.iter().filter(|f| !f.attrs.skip).collect();
    let idents: Vec<&syn::Ident> = active.iter().map(|f| &f.ident).collect();
    let descriptors: Vec<TokenStream> = active
        .iter()
        .map(|f| field_descriptor(f, krate))
        .collect();
    let (enc, dec) = if active.is_empty() {
        (format_ident!("_enc"), format_ident!("_dec"))
    } else {
        (format_ident!("enc"), format_ident!("dec"))
    };
    quote! {
        const RECORD: bool = true;

        fn encode_env(&self, #enc: &mut #krate::Encoder<'_>) -> #krate::EnvResult<()> {
            #( #enc.field(&#descriptors, &self.#idents)?; )*
            ::core::result::Result::Ok(())
        }

        fn decode_env(&mut self, #dec: &mut #krate::Decoder<'_>) -> #krate::EnvResult<()> {
            #defaults
            #( #dec.field(&#descriptors, &mut self.#idents)?; )*
            ::core::result::Result::Ok(())
        }

        fn initialize_members(&mut self) -> #krate::EnvResult<()> {
            #( #krate::EnvMarshal::initialize_self(&mut self.#idents)?; )*
            ::core::result::Result::Ok(())
        }
    }
}

fn newtype_body(
    inner: &syn::Type,
    defaults: Option<&TokenStream>,
    krate: &TokenStream,
) -> TokenStream {
    quote! {
        const RECORD: bool = <#inner as #krate::EnvMarshal>::RECORD;

        fn encode_env(&self, enc: &mut #krate::Encoder<'_>) -> #krate::EnvResult<()> {
            #krate::EnvMarshal::encode_env(&self.0, enc)
        }

        fn decode_env(&mut self, dec: &mut #krate::Decoder<'_>) -> #krate::EnvResult<()> {
            #defaults
            #krate::EnvMarshal::decode_env(&mut self.0, dec)
        }

        fn initialize_members(&mut self) -> #krate::EnvResult<()> {
            #krate::EnvMarshal::initialize_members(&mut self.0)
        }
    }
}

fn text_body(defaults: Option<&TokenStream>, krate: &TokenStream) -> TokenStream {
    quote! {
        fn encode_env(&self, enc: &mut #krate::Encoder<'_>) -> #krate::EnvResult<()> {
            enc.text(self)
        }

        fn decode_env(&mut self, dec: &mut #krate::Decoder<'_>) -> #krate::EnvResult<()> {
            #defaults
            dec.text(self)
        }
    }
}

/// Own initialization: the type's hook when it opted in, otherwise the
/// inner value's for newtypes and nothing for other shapes.
fn initialize_self(input: &ParsedInput, krate: &TokenStream) -> Option<TokenStream> {
    if input.attrs.initialize {
        return Some(quote! {
            fn initialize_self(&mut self) -> #krate::EnvResult<()> {
                #krate::apply_initialize(self)
            }
        });
    }
    matches!(input.shape, Shape::Newtype(_)).then(|| {
        quote! {
            fn initialize_self(&mut self) -> #krate::EnvResult<()> {
                #krate::EnvMarshal::initialize_self(&mut self.0)
            }
        }
    })
}
