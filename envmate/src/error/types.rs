//! Primary error enum for marshaling flows.

use std::fmt;

use thiserror::Error;

/// Boxed error returned by capability hooks and scalar parsers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Scalar kinds a leaf value is formatted as or parsed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `bool`.
    Bool,
    /// Signed integers.
    Int,
    /// Unsigned integers.
    Uint,
    /// `f32` and `f64`.
    Float,
    /// `String` and `char`.
    Text,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::Text => "string",
        })
    }
}

/// Errors raised while encoding a value into, or decoding it from, a flat
/// store.
///
/// Every variant aborts the traversal that produced it. A store written by a
/// failed encode, or a value touched by a failed decode, is in an unspecified
/// partial state and should be discarded.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EnvError {
    /// A custom text renderer failed while encoding.
    #[error("failed to marshal text at '{key}': {source}")]
    Marshal {
        /// Flat key (without prefix) being written.
        key: String,
        /// Error reported by the renderer.
        #[source]
        source: BoxError,
    },

    /// A custom text parser rejected a stored value.
    #[error("failed to unmarshal text at '{key}': {source}")]
    Unmarshal {
        /// Flat key (without prefix) being read.
        key: String,
        /// Error reported by the parser.
        #[source]
        source: BoxError,
    },

    /// A stored value is not valid for the scalar it targets.
    #[error("failed to parse {kind} at '{key}' from {value:?}: {source}")]
    Parse {
        /// Scalar kind of the target field.
        kind: ScalarKind,
        /// Flat key (without prefix) being read.
        key: String,
        /// Raw stored text.
        value: String,
        /// Underlying parse failure.
        #[source]
        source: BoxError,
    },

    /// The value has a shape with no flat representation, such as a map.
    #[error("unsupported type {type_name} at '{key}'")]
    UnsupportedType {
        /// Rust type name of the offending value.
        type_name: &'static str,
        /// Flat key (without prefix) of the offending value.
        key: String,
    },

    /// The stored keys describe a sequence longer than a decode will
    /// allocate.
    #[error("sequence at '{key}' has {len} elements, more than the limit of {limit}")]
    SequenceTooLong {
        /// Flat key (without prefix) of the sequence.
        key: String,
        /// Length inferred from the stored keys.
        len: usize,
        /// Largest length a decode accepts.
        limit: usize,
    },

    /// A `SetDefaults` hook failed.
    #[error("failed to set defaults for {type_name}: {source}")]
    Defaults {
        /// Rust type name whose hook failed.
        type_name: &'static str,
        /// Error reported by the hook.
        #[source]
        source: BoxError,
    },

    /// An `Initialize` hook failed.
    #[error("failed to initialize {type_name}: {source}")]
    Initialize {
        /// Rust type name whose hook failed.
        type_name: &'static str,
        /// Error reported by the hook.
        #[source]
        source: BoxError,
    },
}

impl EnvError {
    /// Returns the flat key the error refers to, when it concerns a stored
    /// entry rather than a whole type.
    ///
    /// # Examples
    ///
    /// ```
    /// use envmate::EnvError;
    ///
    /// let err = EnvError::UnsupportedType {
    ///     type_name: "BTreeMap<String, u8>",
    ///     key: "LABELS".into(),
    /// };
    /// assert_eq!(err.key(), Some("LABELS"));
    /// ```
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Marshal { key, .. }
            | Self::Unmarshal { key, .. }
            | Self::Parse { key, .. }
            | Self::UnsupportedType { key, .. }
            | Self::SequenceTooLong { key, .. } => Some(key),
            Self::Defaults { .. } | Self::Initialize { .. } => None,
        }
    }
}
