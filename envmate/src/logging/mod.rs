//! Logging settings read from the environment.
//!
//! [`LogSettings`] is an ordinary marshaled record: embed it in an
//! application's settings type and its fields are read from keys such as
//! `APP_LOG_LEVEL`. Its initialization hook turns the decoded fields into a
//! [`tracing::Dispatch`] that the application installs.

use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use thiserror::Error;
use tracing::Dispatch;
use tracing::dispatcher::{self, SetGlobalDefaultError};
use tracing_subscriber::filter::{EnvFilter, LevelFilter, ParseError};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

use crate::EnvMarshal;
use crate::capability::{Initialize, SetDefaults, TextCodec, apply_defaults, apply_initialize};
use crate::error::{EnvResult, HookResult};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Output format of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnvMarshal)]
#[envmate(crate = "crate", text)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Unrecognized [`LogFormat`] name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log format {0:?}, expected `text` or `json`")]
pub struct UnknownLogFormat(String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("text") {
            Ok(Self::Text)
        } else if s.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(UnknownLogFormat(s.to_owned()))
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

impl TextCodec for LogFormat {
    fn render_text(&self) -> HookResult<String> {
        Ok(self.to_string())
    }

    fn parse_text(&mut self, text: &str) -> HookResult {
        *self = text.parse()?;
        Ok(())
    }
}

/// Failures while turning settings into a dispatcher.
#[derive(Debug, Error)]
enum SetupError {
    #[error("invalid log level directive {directive:?}: {source}")]
    Level {
        directive: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to open log file '{path}': {source}")]
    Open {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why [`LogSettings::install`] did not install a dispatcher.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InstallError {
    /// The settings were never initialized, so there is nothing to install.
    #[error("logging settings have not been initialized")]
    NotInitialized,
    /// Another global dispatcher was installed first.
    #[error("a global tracing dispatcher is already installed")]
    AlreadyInstalled(#[source] SetGlobalDefaultError),
}

/// Log output configuration.
///
/// Empty paths disable the corresponding file. Without `file`, events go to
/// standard output; `err_file` additionally receives every `ERROR` event.
///
/// # Examples
///
/// ```
/// use envmate::{EnvApp, EnvMarshal, LogFormat, LogSettings};
///
/// #[derive(Debug, Default, EnvMarshal)]
/// struct Settings {
///     log: LogSettings,
/// }
///
/// let mut settings = Settings::default();
/// EnvApp::new("app").unmarshal(["APP_LOG_FORMAT=json"], &mut settings)?;
/// assert_eq!(settings.log.format, LogFormat::Json);
/// assert_eq!(settings.log.level, "info");
/// assert!(settings.log.dispatch().is_some());
/// # Ok::<(), envmate::AppError>(())
/// ```
#[derive(Debug, Clone, Default, EnvMarshal)]
#[envmate(crate = "crate", defaults, initialize)]
pub struct LogSettings {
    /// File receiving a copy of every `ERROR` event.
    pub err_file: Utf8PathBuf,
    /// File receiving all events instead of standard output.
    pub file: Utf8PathBuf,
    /// Line format.
    pub format: LogFormat,
    /// Filter directive such as `info` or `envmate=trace,warn`.
    pub level: String,
    /// Whether events carry the source file and line.
    pub report_caller: bool,
    #[envmate(skip)]
    dispatch: Option<Dispatch>,
}

impl LogSettings {
    /// Starts a builder applying explicit options over the defaults.
    pub fn builder() -> LogSettingsBuilder {
        LogSettingsBuilder::default()
    }

    /// Dispatcher built by the last successful initialization.
    #[must_use]
    pub const fn dispatch(&self) -> Option<&Dispatch> {
        self.dispatch.as_ref()
    }

    /// Installs the dispatcher as the process-wide default.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::NotInitialized`] before initialization and
    /// [`InstallError::AlreadyInstalled`] when a global default exists.
    pub fn install(&self) -> Result<(), InstallError> {
        let dispatch = self.dispatch.clone().ok_or(InstallError::NotInitialized)?;
        dispatcher::set_global_default(dispatch).map_err(InstallError::AlreadyInstalled)
    }

    fn build_dispatch(&self) -> Result<Dispatch, SetupError> {
        let filter = EnvFilter::try_new(&self.level).map_err(|source| SetupError::Level {
            directive: self.level.clone(),
            source,
        })?;
        let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
        let main = if self.file.as_str().is_empty() {
            self.fmt_layer(BoxMakeWriter::new(io::stdout), true)
        } else {
            self.fmt_layer(BoxMakeWriter::new(open_append(&self.file)?), false)
        };
        layers.push(main.with_filter(filter).boxed());
        if !self.err_file.as_str().is_empty() {
            let errors = self.fmt_layer(BoxMakeWriter::new(open_append(&self.err_file)?), false);
            layers.push(errors.with_filter(LevelFilter::ERROR).boxed());
        }
        Ok(Dispatch::new(Registry::default().with(layers)))
    }

    fn fmt_layer(&self, writer: BoxMakeWriter, ansi: bool) -> BoxedLayer {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_file(self.report_caller)
            .with_line_number(self.report_caller);
        match self.format {
            LogFormat::Text => layer.boxed(),
            LogFormat::Json => layer.json().boxed(),
        }
    }
}

impl SetDefaults for LogSettings {
    fn set_defaults(&mut self) -> HookResult {
        if self.level.is_empty() {
            "info".clone_into(&mut self.level);
        }
        Ok(())
    }
}

impl Initialize for LogSettings {
    fn initialize(&mut self) -> HookResult {
        self.dispatch = Some(self.build_dispatch()?);
        Ok(())
    }
}

fn open_append(path: &Utf8Path) -> Result<Arc<std::fs::File>, SetupError> {
    let open = || -> io::Result<std::fs::File> {
        let name = path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
        let mut options = OpenOptions::new();
        options.append(true).create(true);
        Ok(dir.open_with(name, &options)?.into_std())
    };
    open().map(Arc::new).map_err(|source| SetupError::Open {
        path: path.to_owned(),
        source,
    })
}

/// Builds [`LogSettings`] outside of a decode: defaults first, then the
/// explicit options, then initialization.
///
/// # Examples
///
/// ```
/// use envmate::{LogFormat, LogSettings};
///
/// let settings = LogSettings::builder()
///     .level("debug")
///     .format(LogFormat::Json)
///     .build()?;
/// assert_eq!(settings.level, "debug");
/// assert!(settings.dispatch().is_some());
/// # Ok::<(), envmate::EnvError>(())
/// ```
#[derive(Debug, Default)]
#[must_use]
pub struct LogSettingsBuilder {
    err_file: Option<Utf8PathBuf>,
    file: Option<Utf8PathBuf>,
    format: Option<LogFormat>,
    level: Option<String>,
    report_caller: Option<bool>,
}

impl LogSettingsBuilder {
    /// Sets the error-only log file.
    pub fn err_file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.err_file = Some(path.into());
        self
    }

    /// Sets the main log file.
    pub fn file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Sets the line format.
    pub const fn format(mut self, format: LogFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the filter directive.
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Enables or disables source locations.
    pub const fn report_caller(mut self, enabled: bool) -> Self {
        self.report_caller = Some(enabled);
        self
    }

    /// Produces initialized settings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EnvError::Initialize`] when the level directive is
    /// invalid or a log file cannot be opened.
    pub fn build(self) -> EnvResult<LogSettings> {
        let mut settings = LogSettings::default();
        apply_defaults(&mut settings)?;
        if let Some(err_file) = self.err_file {
            settings.err_file = err_file;
        }
        if let Some(file) = self.file {
            settings.file = file;
        }
        if let Some(format) = self.format {
            settings.format = format;
        }
        if let Some(level) = self.level {
            settings.level = level;
        }
        if let Some(report_caller) = self.report_caller {
            settings.report_caller = report_caller;
        }
        apply_initialize(&mut settings)?;
        Ok(settings)
    }
}
