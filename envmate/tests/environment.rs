//! Loading settings from the process environment.
//!
//! Every test runs inside `figment::Jail`, which serializes access to the
//! process environment and restores it afterwards.

mod common;

use std::net::Ipv4Addr;

use common::{ServiceConfig, service_config};
use envmate::{EnvApp, EnvError, EnvMarshal, LogFormat, LogSettings, Stage};
use rstest::rstest;

#[derive(Debug, Default, EnvMarshal)]
struct Deployment {
    #[envmate(flatten)]
    service: ServiceConfig,
    log: LogSettings,
}

fn jail_error(err: impl std::fmt::Display) -> figment::Error {
    figment::Error::from(err.to_string())
}

#[test]
fn process_environment_populates_nested_settings() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("ENVMATE_IT_NAME", "edge");
        jail.set_env("ENVMATE_IT_PORT", "9090");
        jail.set_env("ENVMATE_IT_BIND", "10.1.2.3");
        jail.set_env("ENVMATE_IT_UPSTREAMS_1_TAGS_0", "green");
        jail.set_env("ENVMATE_IT_LOG_FORMAT", "json");
        jail.set_env("ENVMATE_IT_LOG_LEVEL", "debug");

        let mut deployment = Deployment::default();
        EnvApp::new("envmate-it")
            .unmarshal_env(&mut deployment)
            .map_err(jail_error)?;

        let service = &deployment.service;
        assert_eq!(service.name, "edge");
        assert_eq!(service.listen.port, 9090);
        assert_eq!(*service.bind, Ipv4Addr::new(10, 1, 2, 3));
        assert_eq!(service.upstreams.len(), 2);
        assert_eq!(
            service.upstreams.get(1).map(|up| up.tags.clone()),
            Some(vec!["green".to_owned()])
        );
        assert_eq!(deployment.log.format, LogFormat::Json);
        assert_eq!(deployment.log.level, "debug");
        assert!(deployment.log.dispatch().is_some());
        Ok(())
    });
}

#[test]
fn malformed_custom_text_fails_the_decode_stage() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("ENVMATE_IT_BIND", "10.1.2");
        let mut deployment = Deployment::default();
        let Err(err) = EnvApp::new("envmate-it").unmarshal_env(&mut deployment) else {
            return Err(jail_error("malformed address accepted"));
        };
        assert_eq!(err.stage(), Stage::Decode);
        assert!(matches!(err.kind(), EnvError::Unmarshal { key, .. } if key == "BIND"));
        Ok(())
    });
}

#[test]
fn invalid_log_level_fails_the_initialize_stage() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("ENVMATE_IT_LOG_LEVEL", "envmate=loudest");
        let mut deployment = Deployment::default();
        let Err(err) = EnvApp::new("envmate-it").unmarshal_env(&mut deployment) else {
            return Err(jail_error("invalid level accepted"));
        };
        assert_eq!(err.stage(), Stage::Initialize);
        assert!(err.to_string().starts_with("failed to initialize: "));
        Ok(())
    });
}

#[rstest]
fn exported_view_reloads_from_the_environment(service_config: ServiceConfig) {
    figment::Jail::expect_with(|jail| {
        let app = EnvApp::new("envmate-it");
        let view = app.view(&service_config).map_err(jail_error)?;
        for line in view.lines() {
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| jail_error(format!("malformed view line {line:?}")))?;
            jail.set_env(key, value);
        }
        let mut reloaded = ServiceConfig::default();
        app.unmarshal_env(&mut reloaded).map_err(jail_error)?;
        assert_eq!(reloaded, service_config);
        Ok(())
    });
}
