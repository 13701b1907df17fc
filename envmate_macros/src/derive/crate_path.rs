//! Crate path resolution for dependency aliasing support.
//!
//! Converts the optional `#[envmate(crate = "...")]` attribute value into the
//! tokens that prefix every runtime path in generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path from the parsed type attribute.
///
/// Defaults to `envmate` when no override is present.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { envmate }, |path| quote! { #path })
}

#[cfg(test)]
mod tests {
    //! Unit tests for crate path resolution with default and custom paths.

    use anyhow::{Result, anyhow, ensure};
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::default(None, "envmate")]
    #[case::custom(Some("my_alias"), "my_alias")]
    #[case::nested(Some("deps::envmate"), "deps :: envmate")]
    #[case::local(Some("crate"), "crate")]
    fn resolve_produces_expected_tokens(
        #[case] input: Option<&str>,
        #[case] expected: &str,
    ) -> Result<()> {
        let parsed = input
            .map(syn::parse_str::<syn::Path>)
            .transpose()
            .map_err(|err| anyhow!(err))?;
        let tokens = resolve(parsed.as_ref());
        ensure!(tokens.to_string() == expected, "resolved to {tokens}");
        Ok(())
    }
}
