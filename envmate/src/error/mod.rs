//! Error types produced by the marshaling engine.

mod types;

pub use types::{BoxError, EnvError, ScalarKind};

/// Result alias used across the marshaling engine.
pub type EnvResult<T> = Result<T, EnvError>;

/// Result returned by capability hooks such as [`crate::SetDefaults`].
pub type HookResult<T = ()> = Result<T, BoxError>;
