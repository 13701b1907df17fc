//! Tests for the generated `EnvMarshal` implementations.
//!
//! Token streams are compared after whitespace removal so the assertions do
//! not depend on `proc_macro2`'s spacing rules.

use anyhow::{Result, anyhow, ensure};
use proc_macro2::TokenStream;
use quote::quote;
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

use super::marshal_impl;
use crate::derive::parse::parse_input;

fn expand(input: &DeriveInput) -> Result<String> {
    let parsed = parse_input(input).map_err(|err| anyhow!(err))?;
    let krate: TokenStream = quote! { envmate };
    let tokens = marshal_impl(&parsed, &krate);
    Ok(tokens.to_string().split_whitespace().collect())
}

fn squashed(tokens: &TokenStream) -> String {
    tokens.to_string().split_whitespace().collect()
}

#[rstest]
#[case::record_flag(quote! { const RECORD: bool = true; })]
#[case::plain_field(quote! { enc.field(&envmate::Field::new("HOST"), &self.host)?; })]
#[case::renamed_field(quote! {
    dec.field(&envmate::Field::new("DEBUG").renamed(), &mut self.verbose)?;
})]
#[case::flattened_field(quote! {
    enc.field(&envmate::Field::new("COMMON").flatten(), &self.common)?;
})]
#[case::member_initialization(quote! {
    envmate::EnvMarshal::initialize_self(&mut self.host)?;
})]
fn records_visit_each_member(#[case] expected: TokenStream) -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Server {
            host: String,
            #[envmate(rename = "DEBUG")]
            verbose: bool,
            #[envmate(flatten)]
            common: Common,
            #[envmate(skip)]
            cache: Cache,
        }
    };
    let expanded = expand(&input)?;
    let fragment = squashed(&expected);
    ensure!(expanded.contains(&fragment), "missing {fragment} in {expanded}");
    ensure!(!expanded.contains("self.cache"), "skipped field was visited");
    Ok(())
}

#[test]
fn defaults_hook_runs_before_members() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[envmate(defaults)]
        struct Server { host: String }
    };
    let expanded = expand(&input)?;
    let hook = expanded
        .find("envmate::apply_defaults(self)?;")
        .ok_or_else(|| anyhow!("defaults hook missing: {expanded}"))?;
    let member = expanded
        .find("dec.field(")
        .ok_or_else(|| anyhow!("member decode missing: {expanded}"))?;
    ensure!(hook < member, "defaults hook runs after members");
    Ok(())
}

#[test]
fn initialize_attribute_overrides_own_hook() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[envmate(initialize)]
        struct Pool { size: u8 }
    };
    let expanded = expand(&input)?;
    ensure!(
        expanded.contains("fninitialize_self(&mutself)->envmate::EnvResult<()>{envmate::apply_initialize(self)}"),
        "initialize hook missing: {expanded}"
    );
    Ok(())
}

#[test]
fn newtypes_delegate_to_their_inner_value() -> Result<()> {
    let input: DeriveInput = parse_quote! { struct Wrapped(Inner); };
    let expanded = expand(&input)?;
    for fragment in [
        "constRECORD:bool=<Innerasenvmate::EnvMarshal>::RECORD;",
        "envmate::EnvMarshal::encode_env(&self.0,enc)",
        "envmate::EnvMarshal::decode_env(&mutself.0,dec)",
        "envmate::EnvMarshal::initialize_self(&mutself.0)",
    ] {
        ensure!(expanded.contains(fragment), "missing {fragment} in {expanded}");
    }
    Ok(())
}

#[test]
fn text_types_store_one_entry() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[envmate(text, defaults)]
        enum Mode { Fast, Slow }
    };
    let expanded = expand(&input)?;
    ensure!(expanded.contains("enc.text(self)"), "encode missing: {expanded}");
    ensure!(
        expanded.contains("envmate::apply_defaults(self)?;dec.text(self)"),
        "decode missing: {expanded}"
    );
    ensure!(!expanded.contains("RECORD"), "text type marked as record");
    Ok(())
}

#[test]
fn empty_records_ignore_their_walkers() -> Result<()> {
    let input: DeriveInput = parse_quote! { struct Marker; };
    let expanded = expand(&input)?;
    ensure!(expanded.contains("_enc:&mutenvmate::Encoder<'_>"), "{expanded}");
    ensure!(expanded.contains("_dec:&mutenvmate::Decoder<'_>"), "{expanded}");
    Ok(())
}

#[rstest]
#[case::record(
    parse_quote! { struct Holder<T> { value: T } },
    "impl<T:envmate::EnvMarshal>envmate::EnvMarshalforHolder<T>"
)]
#[case::text(
    parse_quote! { #[envmate(text)] struct Tagged<T>(T); },
    "whereSelf:envmate::TextCodec"
)]
fn generic_parameters_are_bounded(
    #[case] input: DeriveInput,
    #[case] expected: &str,
) -> Result<()> {
    let expanded = expand(&input)?;
    ensure!(expanded.contains(expected), "missing {expected} in {expanded}");
    Ok(())
}
