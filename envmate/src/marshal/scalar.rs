//! Canonical text forms of scalar leaves.

use thiserror::Error;

use crate::error::{BoxError, ScalarKind};

/// A leaf stored as exactly one entry in canonical form.
pub(crate) trait Scalar: Sized {
    const KIND: ScalarKind;

    fn format_scalar(&self) -> String;

    fn parse_scalar(raw: &str) -> Result<Self, BoxError>;
}

/// Rejected boolean literal.
#[derive(Debug, Error)]
#[error("expected one of 1, t, T, TRUE, true, True, 0, f, F, FALSE, false, False")]
pub(crate) struct InvalidBool;

/// Parses the boolean spellings accepted by environment tooling.
pub(crate) fn parse_bool(raw: &str) -> Result<bool, InvalidBool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(InvalidBool),
    }
}

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn format_scalar(&self) -> String {
        self.to_string()
    }

    fn parse_scalar(raw: &str) -> Result<Self, BoxError> {
        Ok(parse_bool(raw)?)
    }
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn format_scalar(&self) -> String {
        self.clone()
    }

    fn parse_scalar(raw: &str) -> Result<Self, BoxError> {
        Ok(raw.to_owned())
    }
}

macro_rules! from_str_scalars {
    ($kind:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: ScalarKind = ScalarKind::$kind;

                fn format_scalar(&self) -> String {
                    self.to_string()
                }

                fn parse_scalar(raw: &str) -> Result<Self, BoxError> {
                    Ok(raw.parse::<$ty>()?)
                }
            }
        )+
    };
}

from_str_scalars!(Int => i8, i16, i32, i64, i128, isize);
from_str_scalars!(Uint => u8, u16, u32, u64, u128, usize);
// `Display` for floats is the shortest text that parses back to the same value.
from_str_scalars!(Float => f32, f64);
from_str_scalars!(Text => char);
