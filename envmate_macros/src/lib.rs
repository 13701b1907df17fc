//! Procedural macros for `envmate`.
//!
//! `#[derive(EnvMarshal)]` generates the `envmate::EnvMarshal` implementation
//! that describes a type's shape to the encoder and decoder, replacing any
//! need for runtime reflection.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `envmate::EnvMarshal`.
///
/// Structs with named fields become records: every field is stored under
/// its name in SHOUTY_SNAKE case, nested below the parent's key. Tuple
/// structs with a single field are transparent and store their inner value
/// at the same key.
///
/// Field attributes:
///
/// - `#[envmate(rename = "NAME")]` stores the field under `NAME`.
/// - `#[envmate(skip)]` leaves the field out of every traversal.
/// - `#[envmate(flatten)]` merges a record field's members into the parent
///   key. Ignored when the field is renamed or is not a record.
///
/// Type attributes:
///
/// - `#[envmate(text)]` stores the whole value as one entry through its
///   `TextCodec` implementation. Required for enums.
/// - `#[envmate(defaults)]` runs the type's `SetDefaults` hook before it is
///   decoded.
/// - `#[envmate(initialize)]` runs the type's `Initialize` hook during the
///   post-decode initialization pass.
/// - `#[envmate(crate = "path")]` names the runtime crate when it is
///   re-exported or renamed.
#[proc_macro_derive(EnvMarshal, attributes(envmate))]
pub fn derive_env_marshal(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
