//! Capability traits that types opt into.
//!
//! The traversal only consults a capability when the type's
//! [`EnvMarshal`](crate::EnvMarshal) implementation says so; derived
//! implementations do that when the type carries `#[envmate(defaults)]`,
//! `#[envmate(initialize)]` or `#[envmate(text)]`.

use std::any::type_name;

use crate::error::{EnvError, EnvResult, HookResult};

/// Puts a value into its default state before it is decoded.
///
/// Decoding calls the hook top-down: an outer record's defaults are applied
/// before any of its members are visited, so stored values override defaults
/// and the hook never sees already-decoded members.
pub trait SetDefaults {
    /// Mutates `self` in place to its default state.
    ///
    /// # Errors
    ///
    /// Any error aborts the decode as [`EnvError::Defaults`].
    fn set_defaults(&mut self) -> HookResult;
}

/// Post-decode hook run once per top-level member.
pub trait Initialize {
    /// Finishes setting up `self` after a successful decode.
    ///
    /// # Errors
    ///
    /// Any error is reported as [`EnvError::Initialize`].
    fn initialize(&mut self) -> HookResult;
}

/// Custom textual representation that replaces structural traversal.
///
/// # Examples
///
/// ```
/// use envmate::{EnvMarshal, EnvStore, HookResult, TextCodec};
///
/// #[derive(Debug, Default, PartialEq, EnvMarshal)]
/// #[envmate(text)]
/// struct Rgb(u8, u8, u8);
///
/// impl TextCodec for Rgb {
///     fn render_text(&self) -> HookResult<String> {
///         Ok(format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2))
///     }
///
///     fn parse_text(&mut self, text: &str) -> HookResult {
///         let hex = text.strip_prefix('#').ok_or("colours start with '#'")?;
///         let channel = |at| {
///             hex.get(at..at + 2)
///                 .ok_or("colours have six hex digits")
///                 .and_then(|digits| u8::from_str_radix(digits, 16).map_err(|_| "bad hex digit"))
///         };
///         *self = Rgb(channel(0)?, channel(2)?, channel(4)?);
///         Ok(())
///     }
/// }
///
/// #[derive(Debug, Default, PartialEq, EnvMarshal)]
/// struct Theme {
///     accent: Rgb,
/// }
///
/// let mut store = EnvStore::new("ui");
/// store.encode(&Theme { accent: Rgb(255, 0, 16) })?;
/// assert_eq!(store.render(), "UI_ACCENT=#ff0010\n");
///
/// let mut theme = Theme::default();
/// store.decode(&mut theme)?;
/// assert_eq!(theme.accent, Rgb(255, 0, 16));
/// # Ok::<(), envmate::EnvError>(())
/// ```
pub trait TextCodec {
    /// Renders `self` as a single stored value.
    ///
    /// # Errors
    ///
    /// Any error aborts the encode as [`EnvError::Marshal`].
    fn render_text(&self) -> HookResult<String>;

    /// Replaces `self` with the value described by `text`.
    ///
    /// # Errors
    ///
    /// Any error aborts the decode as [`EnvError::Unmarshal`].
    fn parse_text(&mut self, text: &str) -> HookResult;
}

/// Runs `value`'s [`SetDefaults`] hook, tagging failures with its type.
///
/// # Errors
///
/// Returns [`EnvError::Defaults`] when the hook fails.
pub fn apply_defaults<T: SetDefaults + ?Sized>(value: &mut T) -> EnvResult<()> {
    value
        .set_defaults()
        .map_err(|source| EnvError::Defaults {
            type_name: type_name::<T>(),
            source,
        })
}

/// Runs `value`'s [`Initialize`] hook, tagging failures with its type.
///
/// # Errors
///
/// Returns [`EnvError::Initialize`] when the hook fails.
pub fn apply_initialize<T: Initialize + ?Sized>(value: &mut T) -> EnvResult<()> {
    value
        .initialize()
        .map_err(|source| EnvError::Initialize {
            type_name: type_name::<T>(),
            source,
        })
}
