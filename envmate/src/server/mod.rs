//! Listener settings for a network service.
//!
//! [`ServerSettings`] follows the same pattern as [`crate::LogSettings`]:
//! defaults fill the port, the decode reads `HOST` and `PORT`, and the
//! initialization hook resolves them into the socket address to bind.

use std::net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

use crate::EnvMarshal;
use crate::capability::{Initialize, SetDefaults, apply_defaults, apply_initialize};
use crate::error::{EnvResult, HookResult};

/// Port used when nothing else is configured.
pub const DEFAULT_PORT: u16 = 80;

#[derive(Debug, Error)]
enum ListenError {
    #[error("listen port must be non-zero")]
    ZeroPort,
    #[error("invalid listen host {host:?}: {source}")]
    Host {
        host: String,
        #[source]
        source: AddrParseError,
    },
}

/// Where a service accepts connections.
///
/// An empty `host` listens on every IPv4 interface.
///
/// # Examples
///
/// ```
/// use envmate::{EnvApp, EnvMarshal, ServerSettings};
///
/// #[derive(Debug, Default, EnvMarshal)]
/// struct Settings {
///     http: ServerSettings,
/// }
///
/// let mut settings = Settings::default();
/// EnvApp::new("app").unmarshal(["APP_HTTP_HOST=127.0.0.1"], &mut settings)?;
/// assert_eq!(settings.http.port, 80);
/// assert_eq!(
///     settings.http.listen_addr().map(|addr| addr.to_string()),
///     Some("127.0.0.1:80".to_owned())
/// );
/// # Ok::<(), envmate::AppError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, EnvMarshal)]
#[envmate(crate = "crate", defaults, initialize)]
pub struct ServerSettings {
    /// Interface address; empty means all interfaces.
    pub host: String,
    /// TCP port.
    pub port: u16,
    #[envmate(skip)]
    listen: Option<SocketAddr>,
}

impl ServerSettings {
    /// Starts a builder applying explicit options over the defaults.
    pub fn builder() -> ServerSettingsBuilder {
        ServerSettingsBuilder::default()
    }

    /// Address resolved by the last successful initialization.
    #[must_use]
    pub const fn listen_addr(&self) -> Option<SocketAddr> {
        self.listen
    }

    fn resolve(&self) -> Result<SocketAddr, ListenError> {
        if self.port == 0 {
            return Err(ListenError::ZeroPort);
        }
        let ip = if self.host.is_empty() {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            self.host.parse().map_err(|source| ListenError::Host {
                host: self.host.clone(),
                source,
            })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl SetDefaults for ServerSettings {
    fn set_defaults(&mut self) -> HookResult {
        if self.port == 0 {
            self.port = DEFAULT_PORT;
        }
        Ok(())
    }
}

impl Initialize for ServerSettings {
    fn initialize(&mut self) -> HookResult {
        self.listen = Some(self.resolve()?);
        Ok(())
    }
}

/// Builds [`ServerSettings`] outside of a decode: defaults first, then the
/// explicit options, then initialization.
///
/// # Examples
///
/// ```
/// use envmate::ServerSettings;
///
/// let server = ServerSettings::builder().port(8080).build()?;
/// assert_eq!(server.listen_addr().map(|addr| addr.port()), Some(8080));
/// # Ok::<(), envmate::EnvError>(())
/// ```
#[derive(Debug, Default)]
#[must_use]
pub struct ServerSettingsBuilder {
    host: Option<String>,
    port: Option<u16>,
}

impl ServerSettingsBuilder {
    /// Sets the interface address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the port.
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Produces initialized settings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EnvError::Initialize`] when the port is zero or the
    /// host is not an IP address.
    pub fn build(self) -> EnvResult<ServerSettings> {
        let mut settings = ServerSettings::default();
        apply_defaults(&mut settings)?;
        if let Some(host) = self.host {
            settings.host = host;
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        apply_initialize(&mut settings)?;
        Ok(settings)
    }
}
