//! Decoder half of the traversal.

use std::any::type_name;

use crate::capability::TextCodec;
use crate::error::{EnvError, EnvResult};
use crate::path::{KeyPath, PathScope, Segment, Walker};
use crate::store::EnvStore;

use super::scalar::Scalar;
use super::{EnvMarshal, Field, MAX_SEQUENCE_LEN};

/// Walks a value and fills it from an [`EnvStore`].
#[derive(Debug)]
pub struct Decoder<'s> {
    store: &'s EnvStore,
    path: KeyPath,
}

impl<'s> Decoder<'s> {
    /// Creates a decoder reading `store` from the root path.
    #[must_use]
    pub const fn new(store: &'s EnvStore) -> Self {
        Self {
            store,
            path: KeyPath::new(),
        }
    }

    /// Current path.
    #[must_use]
    pub const fn path(&self) -> &KeyPath {
        &self.path
    }

    /// Current flat key, without prefix.
    #[must_use]
    pub fn key(&self) -> String {
        self.path.render()
    }

    /// Descends into `segment` until the returned scope is dropped.
    pub fn enter(&mut self, segment: impl Into<Segment>) -> PathScope<'_, Self> {
        PathScope::new(self, segment.into())
    }

    /// Raw value stored at the current path, if any.
    #[must_use]
    pub fn lookup(&self) -> Option<&'s str> {
        self.store.get(&self.key()).map(|entry| entry.value())
    }

    /// Length of the sequence stored at the current path.
    #[must_use]
    pub fn infer_len(&self) -> usize {
        self.store.infer_len(&self.key())
    }

    /// Length of the sequence stored at the current path, checked against
    /// [`MAX_SEQUENCE_LEN`].
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::SequenceTooLong`] when a stored index lies beyond
    /// the limit.
    pub fn sequence_len(&self) -> EnvResult<usize> {
        let len = self.infer_len();
        if len > MAX_SEQUENCE_LEN {
            return Err(EnvError::SequenceTooLong {
                key: self.key(),
                len,
                limit: MAX_SEQUENCE_LEN,
            });
        }
        Ok(len)
    }

    /// Decodes a record member, flattening it when `field` squashes.
    ///
    /// # Errors
    ///
    /// Propagates the member's decoding failure.
    pub fn field<T: EnvMarshal + ?Sized>(&mut self, field: &Field, value: &mut T) -> EnvResult<()> {
        if field.squashes::<T>() {
            return value.decode_env(self);
        }
        let mut scope = self.enter(field.name());
        value.decode_env(&mut scope)
    }

    /// Decodes sequence element `index`.
    ///
    /// # Errors
    ///
    /// Propagates the element's decoding failure.
    pub fn element<T: EnvMarshal + ?Sized>(&mut self, index: usize, value: &mut T) -> EnvResult<()> {
        let mut scope = self.enter(index);
        value.decode_env(&mut scope)
    }

    /// Parses the entry at the current path through `value`'s custom text
    /// form. An absent entry leaves `value` as it is.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Unmarshal`] when parsing fails.
    pub fn text<T: TextCodec + ?Sized>(&mut self, value: &mut T) -> EnvResult<()> {
        let Some(raw) = self.lookup() else {
            return Ok(());
        };
        value
            .parse_text(raw)
            .map_err(|source| EnvError::Unmarshal {
                key: self.key(),
                source,
            })
    }

    /// Parses the entry at the current path as a scalar leaf. An absent
    /// entry leaves `value` as it is.
    pub(super) fn scalar<T: Scalar>(&mut self, value: &mut T) -> EnvResult<()> {
        let Some(raw) = self.lookup() else {
            return Ok(());
        };
        *value = T::parse_scalar(raw).map_err(|source| EnvError::Parse {
            kind: T::KIND,
            key: self.key(),
            value: raw.to_owned(),
            source,
        })?;
        Ok(())
    }

    /// Builds the error for a value of type `T` that has no flat form.
    #[must_use]
    pub fn unsupported<T: ?Sized>(&self) -> EnvError {
        EnvError::UnsupportedType {
            type_name: type_name::<T>(),
            key: self.key(),
        }
    }
}

impl Walker for Decoder<'_> {
    fn path_mut(&mut self) -> &mut KeyPath {
        &mut self.path
    }
}
