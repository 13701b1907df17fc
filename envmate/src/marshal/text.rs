//! Adapter storing any `FromStr + Display` type as custom text.

use std::fmt::Display;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use crate::capability::TextCodec;
use crate::error::{BoxError, EnvResult, HookResult};

use super::{Decoder, Encoder, EnvMarshal};

/// Stores the wrapped value through its `Display` and `FromStr` impls.
///
/// Useful for foreign types such as addresses or URLs that already have a
/// canonical text form.
///
/// # Examples
///
/// ```
/// use std::net::Ipv4Addr;
///
/// use envmate::{EnvMarshal, EnvStore, Text};
///
/// #[derive(Debug, PartialEq, EnvMarshal)]
/// struct Listen {
///     addr: Text<Ipv4Addr>,
/// }
///
/// impl Default for Listen {
///     fn default() -> Self {
///         Self { addr: Text(Ipv4Addr::LOCALHOST) }
///     }
/// }
///
/// let store = EnvStore::from_pairs("svc", [("SVC_ADDR", "10.0.0.7")]);
/// let mut listen = Listen::default();
/// store.decode(&mut listen)?;
/// assert_eq!(*listen.addr, Ipv4Addr::new(10, 0, 0, 7));
/// # Ok::<(), envmate::EnvError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Text<T>(pub T);

impl<T> Text<T> {
    /// Unwraps the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Text<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> Deref for Text<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Text<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> TextCodec for Text<T>
where
    T: FromStr + Display,
    T::Err: Into<BoxError>,
{
    fn render_text(&self) -> HookResult<String> {
        Ok(self.0.to_string())
    }

    fn parse_text(&mut self, text: &str) -> HookResult {
        self.0 = text.parse().map_err(Into::into)?;
        Ok(())
    }
}

impl<T> EnvMarshal for Text<T>
where
    T: FromStr + Display,
    T::Err: Into<BoxError>,
{
    fn encode_env(&self, enc: &mut Encoder<'_>) -> EnvResult<()> {
        enc.text(self)
    }

    fn decode_env(&mut self, dec: &mut Decoder<'_>) -> EnvResult<()> {
        dec.text(self)
    }
}
