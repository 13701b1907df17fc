//! Shared test fixtures for integration tests.
//!
//! The service settings below exercise every shape the derive supports:
//! flattened and nested records, sequences of records, optionals, and
//! custom-text leaves.

use std::net::Ipv4Addr;

use camino::Utf8PathBuf;
use envmate::{EnvMarshal, HookResult, SetDefaults, Text};
use rstest::fixture;

/// Listening socket, flattened into the service root.
#[derive(Debug, Default, Clone, PartialEq, EnvMarshal)]
pub struct Listen {
    pub host: String,
    pub port: u16,
}

/// One upstream target.
#[derive(Debug, Default, Clone, PartialEq, EnvMarshal)]
pub struct Upstream {
    pub url: String,
    pub weight: u8,
    pub tags: Vec<String>,
}

/// Optional TLS material.
#[derive(Debug, Default, Clone, PartialEq, EnvMarshal)]
pub struct Tls {
    pub cert: Utf8PathBuf,
    pub key: Utf8PathBuf,
}

/// Settings for a small proxy service.
#[derive(Debug, Clone, PartialEq, EnvMarshal)]
#[envmate(defaults)]
pub struct ServiceConfig {
    pub name: String,
    #[envmate(flatten)]
    pub listen: Listen,
    pub upstreams: Vec<Upstream>,
    pub tls: Option<Tls>,
    pub data_dir: Utf8PathBuf,
    pub bind: Text<Ipv4Addr>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            listen: Listen::default(),
            upstreams: Vec::new(),
            tls: None,
            data_dir: Utf8PathBuf::new(),
            bind: Text(Ipv4Addr::UNSPECIFIED),
        }
    }
}

impl SetDefaults for ServiceConfig {
    fn set_defaults(&mut self) -> HookResult {
        "svc".clone_into(&mut self.name);
        self.listen.port = 8080;
        Ok(())
    }
}

/// Fully populated settings.
#[fixture]
pub fn service_config() -> ServiceConfig {
    ServiceConfig {
        name: "edge".to_owned(),
        listen: Listen {
            host: "0.0.0.0".to_owned(),
            port: 443,
        },
        upstreams: vec![
            Upstream {
                url: "http://a.internal".to_owned(),
                weight: 3,
                tags: vec!["blue".to_owned()],
            },
            Upstream {
                url: "http://b.internal".to_owned(),
                weight: 1,
                tags: Vec::new(),
            },
        ],
        tls: Some(Tls {
            cert: Utf8PathBuf::from("/etc/tls/cert.pem"),
            key: Utf8PathBuf::from("/etc/tls/key.pem"),
        }),
        data_dir: Utf8PathBuf::from("/var/lib/edge"),
        bind: Text(Ipv4Addr::new(10, 0, 0, 1)),
    }
}
