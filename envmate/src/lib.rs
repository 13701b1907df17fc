//! Core crate for the `envmate` structural environment marshaling engine.
//!
//! `envmate` maps nested typed values onto a flat, prefix-scoped store of
//! `PREFIX_KEY=value` entries and back. Each type describes its shape through
//! the [`EnvMarshal`] trait, normally derived with `#[derive(EnvMarshal)]`
//! from the companion `envmate_macros` crate. [`EnvApp`] ties the pieces
//! together for applications reading their settings from the process
//! environment.
//!
//! ```
//! use envmate::{EnvApp, EnvMarshal};
//!
//! #[derive(Debug, Default, PartialEq, EnvMarshal)]
//! struct Settings {
//!     port: u16,
//!     hosts: Vec<String>,
//! }
//!
//! let app = EnvApp::new("demo");
//! let mut settings = Settings::default();
//! app.unmarshal(["DEMO_PORT=8080", "DEMO_HOSTS_1=b", "DEMO_HOSTS_0=a"], &mut settings)?;
//! assert_eq!(settings.port, 8080);
//! assert_eq!(settings.hosts, ["a", "b"]);
//! # Ok::<(), envmate::AppError>(())
//! ```

pub use envmate_macros::EnvMarshal;

mod app;
mod capability;
mod error;
mod logging;
mod marshal;
mod path;
mod server;
mod store;

pub use app::{AppError, EnvApp, Stage};
pub use capability::{Initialize, SetDefaults, TextCodec, apply_defaults, apply_initialize};
pub use error::{BoxError, EnvError, EnvResult, HookResult, ScalarKind};
pub use logging::{InstallError, LogFormat, LogSettings, LogSettingsBuilder, UnknownLogFormat};
pub use marshal::{Decoder, Encoder, EnvMarshal, Field, MAX_SEQUENCE_LEN, Text};
pub use path::{KeyPath, PathScope, Segment, Walker};
pub use server::{DEFAULT_PORT, ServerSettings, ServerSettingsBuilder};
pub use store::{EnvEntry, EnvStore, normalize_prefix};
