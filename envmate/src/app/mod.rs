//! Application-level entry points over the marshaling engine.
//!
//! [`EnvApp`] remembers an application prefix and exposes the three flows
//! applications need: computing the defaults view of a settings type,
//! loading settings from an environment, and rendering the view of a value.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::error::EnvError;
use crate::marshal::EnvMarshal;
use crate::store::{EnvStore, normalize_prefix};

/// Traversal stage an [`AppError`] was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Stage {
    /// Reading a value from a store, including its defaults hooks.
    Decode,
    /// Writing a value into a store.
    Encode,
    /// Running post-decode initialization hooks.
    Initialize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Decode => "decode",
            Self::Encode => "encode",
            Self::Initialize => "initialize",
        })
    }
}

/// Failure of an [`EnvApp`] operation, tagged with the stage that failed.
///
/// The wrapped [`EnvError`] keeps its kind; only context is added.
#[derive(Debug, Error)]
#[error("failed to {stage}: {source}")]
pub struct AppError {
    stage: Stage,
    #[source]
    source: EnvError,
}

impl AppError {
    const fn new(stage: Stage, source: EnvError) -> Self {
        Self { stage, source }
    }

    /// Stage that failed.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Underlying traversal error.
    #[must_use]
    pub const fn kind(&self) -> &EnvError {
        &self.source
    }

    /// Consumes the wrapper, returning the traversal error.
    #[must_use]
    pub fn into_inner(self) -> EnvError {
        self.source
    }
}

/// Marshaling facade bound to one application prefix.
///
/// # Examples
///
/// ```
/// use envmate::{EnvApp, EnvMarshal, HookResult, SetDefaults};
///
/// #[derive(Debug, Default, EnvMarshal)]
/// #[envmate(defaults)]
/// struct Settings {
///     workers: u8,
///     tags: Vec<String>,
/// }
///
/// impl SetDefaults for Settings {
///     fn set_defaults(&mut self) -> HookResult {
///         self.workers = 4;
///         Ok(())
///     }
/// }
///
/// let app = EnvApp::new("my-svc");
/// assert_eq!(app.prefix(), "MY_SVC_");
///
/// let defaults = app.scan_defaults(&mut Settings::default())?;
/// assert_eq!(defaults.render(), "MY_SVC_WORKERS=4\n");
///
/// let mut settings = Settings::default();
/// app.unmarshal(["MY_SVC_TAGS_0=edge", "OTHER=1"], &mut settings)?;
/// assert_eq!(app.view(&settings)?, "MY_SVC_TAGS_0=edge\nMY_SVC_WORKERS=4\n");
/// # Ok::<(), envmate::AppError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvApp {
    prefix: String,
}

impl EnvApp {
    /// Creates a facade for `prefix`, normalized with
    /// [`normalize_prefix`](crate::normalize_prefix).
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: normalize_prefix(prefix),
        }
    }

    /// Normalized prefix, including its trailing separator when non-empty.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Decodes `value` from an empty store, which applies its defaults hooks
    /// and materializes optional members, then encodes the result.
    ///
    /// The returned store is the defaults view of the type.
    ///
    /// # Errors
    ///
    /// Returns an [`AppError`] tagged [`Stage::Decode`] when a defaults hook
    /// fails, or [`Stage::Encode`] when the defaulted value cannot be encoded.
    pub fn scan_defaults<T: EnvMarshal + ?Sized>(&self, value: &mut T) -> Result<EnvStore, AppError> {
        debug!(prefix = %self.prefix, "scanning defaults");
        let empty = EnvStore::new(&self.prefix);
        empty
            .decode(value)
            .map_err(|err| AppError::new(Stage::Decode, err))?;
        let mut store = EnvStore::new(&self.prefix);
        store
            .encode(value)
            .map_err(|err| AppError::new(Stage::Encode, err))?;
        debug!(entries = store.len(), "defaults scanned");
        Ok(store)
    }

    /// Decodes `value` from `KEY=VALUE` strings, then runs the
    /// initialization pass over its direct members.
    ///
    /// Strings outside the prefix or without `=` are ignored.
    ///
    /// # Errors
    ///
    /// Returns an [`AppError`] tagged [`Stage::Decode`] or
    /// [`Stage::Initialize`].
    pub fn unmarshal<I, S, T>(&self, environ: I, value: &mut T) -> Result<(), AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        T: EnvMarshal + ?Sized,
    {
        self.load(&EnvStore::from_environ(&self.prefix, environ), value)
    }

    /// Like [`EnvApp::unmarshal`], reading a snapshot of the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an [`AppError`] tagged [`Stage::Decode`] or
    /// [`Stage::Initialize`].
    pub fn unmarshal_env<T: EnvMarshal + ?Sized>(&self, value: &mut T) -> Result<(), AppError> {
        self.load(&EnvStore::from_process_env(&self.prefix), value)
    }

    /// Renders `value` as sorted `PREFIX_KEY=value` lines.
    ///
    /// # Errors
    ///
    /// Returns an [`AppError`] tagged [`Stage::Encode`].
    pub fn view<T: EnvMarshal + ?Sized>(&self, value: &T) -> Result<String, AppError> {
        let mut store = EnvStore::new(&self.prefix);
        store
            .encode(value)
            .map_err(|err| AppError::new(Stage::Encode, err))?;
        Ok(store.render())
    }

    fn load<T: EnvMarshal + ?Sized>(&self, store: &EnvStore, value: &mut T) -> Result<(), AppError> {
        debug!(prefix = %self.prefix, entries = store.len(), "decoding environment");
        store
            .decode(value)
            .map_err(|err| AppError::new(Stage::Decode, err))?;
        value
            .initialize_members()
            .map_err(|err| AppError::new(Stage::Initialize, err))
    }
}

#[cfg(test)]
mod tests;
