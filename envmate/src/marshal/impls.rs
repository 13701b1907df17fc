//! [`EnvMarshal`] for standard library and ecosystem types.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use camino::Utf8PathBuf;

use crate::capability::TextCodec;
use crate::error::{EnvResult, HookResult};

use super::{Decoder, Encoder, EnvMarshal};

macro_rules! scalar_marshal {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl EnvMarshal for $ty {
                fn encode_env(&self, enc: &mut Encoder<'_>) -> EnvResult<()> {
                    enc.put(super::scalar::Scalar::format_scalar(self));
                    Ok(())
                }

                fn decode_env(&mut self, dec: &mut Decoder<'_>) -> EnvResult<()> {
                    dec.scalar(self)
                }
            }
        )+
    };
}

scalar_marshal!(
    bool, String, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

/// `None` encodes to nothing. Decoding always materializes the value so that
/// defaults and nested entries land in it.
impl<T: EnvMarshal + Default> EnvMarshal for Option<T> {
    const RECORD: bool = T::RECORD;

    fn encode_env(&self, enc: &mut Encoder<'_>) -> EnvResult<()> {
        self.as_ref().map_or(Ok(()), |inner| inner.encode_env(enc))
    }

    fn decode_env(&mut self, dec: &mut Decoder<'_>) -> EnvResult<()> {
        self.get_or_insert_with(T::default).decode_env(dec)
    }

    fn initialize_self(&mut self) -> EnvResult<()> {
        self.as_mut().map_or(Ok(()), T::initialize_self)
    }
}

impl<T: EnvMarshal + ?Sized> EnvMarshal for Box<T> {
    const RECORD: bool = T::RECORD;

    fn encode_env(&self, enc: &mut Encoder<'_>) -> EnvResult<()> {
        (**self).encode_env(enc)
    }

    fn decode_env(&mut self, dec: &mut Decoder<'_>) -> EnvResult<()> {
        (**self).decode_env(dec)
    }

    fn initialize_self(&mut self) -> EnvResult<()> {
        (**self).initialize_self()
    }
}

impl<T: EnvMarshal> EnvMarshal for [T] {
    fn encode_env(&self, enc: &mut Encoder<'_>) -> EnvResult<()> {
        self.iter()
            .enumerate()
            .try_for_each(|(index, item)| enc.element(index, item))
    }

    fn decode_env(&mut self, dec: &mut Decoder<'_>) -> EnvResult<()> {
        self.iter_mut()
            .enumerate()
            .try_for_each(|(index, item)| dec.element(index, item))
    }
}

impl<T: EnvMarshal, const N: usize> EnvMarshal for [T; N] {
    fn encode_env(&self, enc: &mut Encoder<'_>) -> EnvResult<()> {
        self.as_slice().encode_env(enc)
    }

    fn decode_env(&mut self, dec: &mut Decoder<'_>) -> EnvResult<()> {
        self.as_mut_slice().decode_env(dec)
    }
}

/// The stored length is one past the highest index present under the
/// current path. When nothing is stored the existing elements are kept and
/// decoded in place; otherwise the vector is rebuilt from default slots so
/// that gaps hold `T::default()`.
impl<T: EnvMarshal + Default> EnvMarshal for Vec<T> {
    fn encode_env(&self, enc: &mut Encoder<'_>) -> EnvResult<()> {
        self.as_slice().encode_env(enc)
    }

    fn decode_env(&mut self, dec: &mut Decoder<'_>) -> EnvResult<()> {
        let len = dec.sequence_len()?;
        if len > 0 {
            self.clear();
            self.resize_with(len, T::default);
        }
        self.as_mut_slice().decode_env(dec)
    }
}

impl<K, V, S: BuildHasher> EnvMarshal for HashMap<K, V, S> {
    fn encode_env(&self, enc: &mut Encoder<'_>) -> EnvResult<()> {
        Err(enc.unsupported::<Self>())
    }

    fn decode_env(&mut self, dec: &mut Decoder<'_>) -> EnvResult<()> {
        dec.lookup().map_or(Ok(()), |_| Err(dec.unsupported::<Self>()))
    }
}

impl<K, V> EnvMarshal for BTreeMap<K, V> {
    fn encode_env(&self, enc: &mut Encoder<'_>) -> EnvResult<()> {
        Err(enc.unsupported::<Self>())
    }

    fn decode_env(&mut self, dec: &mut Decoder<'_>) -> EnvResult<()> {
        dec.lookup().map_or(Ok(()), |_| Err(dec.unsupported::<Self>()))
    }
}

impl TextCodec for Utf8PathBuf {
    fn render_text(&self) -> HookResult<String> {
        Ok(self.as_str().to_owned())
    }

    fn parse_text(&mut self, text: &str) -> HookResult {
        *self = Self::from(text);
        Ok(())
    }
}

impl EnvMarshal for Utf8PathBuf {
    fn encode_env(&self, enc: &mut Encoder<'_>) -> EnvResult<()> {
        enc.text(self)
    }

    fn decode_env(&mut self, dec: &mut Decoder<'_>) -> EnvResult<()> {
        dec.text(self)
    }
}
