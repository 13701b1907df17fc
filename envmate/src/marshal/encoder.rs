//! Encoder half of the traversal.

use std::any::type_name;

use crate::capability::TextCodec;
use crate::error::{EnvError, EnvResult};
use crate::path::{KeyPath, PathScope, Segment, Walker};
use crate::store::EnvStore;

use super::{EnvMarshal, Field};

/// Walks a value and writes its leaves into an [`EnvStore`].
#[derive(Debug)]
pub struct Encoder<'s> {
    store: &'s mut EnvStore,
    path: KeyPath,
}

impl<'s> Encoder<'s> {
    /// Creates an encoder writing into `store` at the root path.
    pub const fn new(store: &'s mut EnvStore) -> Self {
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

    /// Stores `value` as a leaf at the current path.
    pub fn put(&mut self, value: impl Into<String>) {
        let key = self.key();
        self.store.set(&key, value);
    }

    /// Encodes a record member, flattening it when `field` squashes.
    ///
    /// # Errors
    ///
    /// Propagates the member's encoding failure.
    pub fn field<T: EnvMarshal + ?Sized>(&mut self, field: &Field, value: &T) -> EnvResult<()> {
        if field.squashes::<T>() {
            return value.encode_env(self);
        }
        let mut scope = self.enter(field.name());
        value.encode_env(&mut scope)
    }

    /// Encodes sequence element `index`.
    ///
    /// # Errors
    ///
    /// Propagates the element's encoding failure.
    pub fn element<T: EnvMarshal + ?Sized>(&mut self, index: usize, value: &T) -> EnvResult<()> {
        let mut scope = self.enter(index);
        value.encode_env(&mut scope)
    }

    /// Stores the custom textual form of `value` at the current path.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Marshal`] when rendering fails.
    pub fn text<T: TextCodec + ?Sized>(&mut self, value: &T) -> EnvResult<()> {
        let text = value.render_text().map_err(|source| EnvError::Marshal {
            key: self.key(),
            source,
        })?;
        self.put(text);
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

impl Walker for Encoder<'_> {
    fn path_mut(&mut self) -> &mut KeyPath {
        &mut self.path
    }
}
