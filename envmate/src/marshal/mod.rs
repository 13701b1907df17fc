//! Type-directed traversal between typed values and an [`EnvStore`].
//!
//! Each type describes its own shape by implementing [`EnvMarshal`]. The
//! implementations shipped here cover scalars, `Option`, `Box`, sequences,
//! and the unsupported map types; `#[derive(EnvMarshal)]` covers records,
//! newtypes, and custom-text types. Dispatch priority is fixed per type:
//! custom text, then optional, then sequence, then record, then scalar.

mod decoder;
mod encoder;
mod impls;
mod scalar;
mod text;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use text::Text;

use crate::error::EnvResult;
use crate::store::EnvStore;

/// Largest `Vec` length a decode will allocate.
///
/// The length of a sequence comes from the highest index among the stored
/// keys, so one stray `APP_ITEMS_99999999=x` would otherwise allocate that
/// many default elements.
pub const MAX_SEQUENCE_LEN: usize = 1 << 16;

/// A type that can be written to and read from a flat store.
///
/// Implement it with `#[derive(EnvMarshal)]`; hand-written implementations
/// are for shapes the derive cannot express.
///
/// # Examples
///
/// ```
/// use envmate::{EnvMarshal, EnvStore};
///
/// #[derive(Debug, Default, PartialEq, EnvMarshal)]
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// #[derive(Debug, Default, PartialEq, EnvMarshal)]
/// struct Config {
///     servers: Vec<Server>,
///     #[envmate(rename = "DEBUG")]
///     verbose: bool,
/// }
///
/// let config = Config {
///     servers: vec![Server { host: "a".into(), port: 80 }],
///     verbose: true,
/// };
/// let mut store = EnvStore::new("app");
/// store.encode(&config)?;
/// assert_eq!(
///     store.render(),
///     "APP_DEBUG=true\nAPP_SERVERS_0_HOST=a\nAPP_SERVERS_0_PORT=80\n"
/// );
///
/// let mut decoded = Config::default();
/// store.decode(&mut decoded)?;
/// assert_eq!(decoded, config);
/// # Ok::<(), envmate::EnvError>(())
/// ```
pub trait EnvMarshal {
    /// Whether values of this type (after looking through `Option` and
    /// `Box`) are structured records. Only records can be flattened into
    /// their parent's path.
    const RECORD: bool = false;

    /// Writes `self` at the encoder's current path.
    ///
    /// # Errors
    ///
    /// Returns an error when a custom renderer fails or the value has no
    /// flat representation.
    fn encode_env(&self, enc: &mut Encoder<'_>) -> EnvResult<()>;

    /// Reads `self` from the decoder's current path. Absent entries leave
    /// the current value untouched.
    ///
    /// # Errors
    ///
    /// Returns an error when a stored value cannot be parsed or a defaults
    /// hook fails.
    fn decode_env(&mut self, dec: &mut Decoder<'_>) -> EnvResult<()>;

    /// Runs this value's own `Initialize` hook, if its type has one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EnvError::Initialize`] when the hook fails.
    fn initialize_self(&mut self) -> EnvResult<()> {
        Ok(())
    }

    /// Runs `Initialize` hooks once after a full decode.
    ///
    /// Records visit their direct members; other values initialize
    /// themselves. The pass is shallow.
    ///
    /// # Errors
    ///
    /// Returns the first hook failure.
    fn initialize_members(&mut self) -> EnvResult<()> {
        self.initialize_self()
    }
}

/// Naming descriptor for one record member.
///
/// Generated by `#[derive(EnvMarshal)]`; the name is either the declared
/// field name in SHOUTY_SNAKE case or the `rename` annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    name: &'static str,
    renamed: bool,
    flatten: bool,
}

impl Field {
    /// Describes a member stored under `name`.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            renamed: false,
            flatten: false,
        }
    }

    /// Marks the name as coming from an explicit rename annotation.
    #[must_use]
    pub const fn renamed(mut self) -> Self {
        self.renamed = true;
        self
    }

    /// Marks the member for flattening into its parent's path.
    #[must_use]
    pub const fn flatten(mut self) -> Self {
        self.flatten = true;
        self
    }

    /// Effective member name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether a member of type `T` merges into the parent path.
    ///
    /// True only when `T` is a record, the member was not renamed, and it
    /// is marked for flattening.
    #[must_use]
    pub const fn squashes<T: EnvMarshal + ?Sized>(&self) -> bool {
        T::RECORD && !self.renamed && self.flatten
    }
}

impl EnvStore {
    /// Encodes `value` into this store.
    ///
    /// # Errors
    ///
    /// Returns the first traversal failure; the store may then hold a
    /// partial encoding and should be discarded.
    pub fn encode<T: EnvMarshal + ?Sized>(&mut self, value: &T) -> EnvResult<()> {
        value.encode_env(&mut Encoder::new(self))
    }

    /// Decodes `value` from this store.
    ///
    /// # Errors
    ///
    /// Returns the first traversal failure; `value` may then be partially
    /// decoded and should be discarded.
    pub fn decode<T: EnvMarshal + ?Sized>(&self, value: &mut T) -> EnvResult<()> {
        value.decode_env(&mut Decoder::new(self))
    }
}
