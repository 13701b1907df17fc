//! Tests for the application facade.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;

use super::{AppError, EnvApp, Stage};
use crate::{EnvError, EnvMarshal, HookResult, Initialize, ScalarKind, SetDefaults};

#[derive(Debug, Default, PartialEq, EnvMarshal)]
#[envmate(crate = "crate", initialize)]
struct Pool {
    size: u8,
    #[envmate(skip)]
    ready: bool,
}

impl Initialize for Pool {
    fn initialize(&mut self) -> HookResult {
        if self.size == 0 {
            return Err("pool size must be positive".into());
        }
        self.ready = true;
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq, EnvMarshal)]
#[envmate(crate = "crate", defaults)]
struct Settings {
    name: String,
    pool: Pool,
    mirrors: Vec<String>,
    proxy: Option<String>,
}

impl SetDefaults for Settings {
    fn set_defaults(&mut self) -> HookResult {
        self.name = "svc".to_owned();
        self.pool.size = 2;
        Ok(())
    }
}

#[rstest]
#[case("my-app", "MY_APP_")]
#[case("MY_APP_", "MY_APP_")]
#[case("", "")]
fn prefix_is_normalized(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(EnvApp::new(raw).prefix(), expected);
}

#[test]
fn scan_defaults_renders_defaulted_value() -> Result<()> {
    let app = EnvApp::new("app");
    let mut settings = Settings::default();
    let store = app.scan_defaults(&mut settings)?;
    ensure!(
        store.render() == "APP_NAME=svc\nAPP_POOL_SIZE=2\nAPP_PROXY=\n",
        "defaults view was {store}"
    );
    ensure!(!settings.pool.ready, "scan_defaults ran initialization");
    Ok(())
}

#[test]
fn unmarshal_decodes_then_initializes() -> Result<()> {
    let app = EnvApp::new("app");
    let mut settings = Settings::default();
    app.unmarshal(
        [
            "APP_POOL_SIZE=8",
            "app_mirrors_1=b",
            "APP_MIRRORS_0=a",
            "APPLE=1",
            "MALFORMED",
        ],
        &mut settings,
    )?;
    ensure!(settings.name == "svc", "defaults not applied");
    ensure!(settings.pool.size == 8, "stored size ignored");
    ensure!(settings.pool.ready, "initialize hook not run");
    ensure!(settings.mirrors == ["a", "b"], "mirrors were {:?}", settings.mirrors);
    ensure!(settings.proxy.as_deref() == Some(""), "proxy was {:?}", settings.proxy);
    Ok(())
}

#[rstest]
#[case::decode(&["APP_POOL_SIZE=many"], Stage::Decode)]
#[case::initialize(&["APP_POOL_SIZE=0"], Stage::Initialize)]
fn failures_are_tagged_with_their_stage(
    #[case] environ: &[&str],
    #[case] expected: Stage,
) -> Result<()> {
    let app = EnvApp::new("app");
    let err = app
        .unmarshal(environ.iter().copied(), &mut Settings::default())
        .err()
        .ok_or_else(|| anyhow!("unmarshal succeeded"))?;
    ensure!(err.stage() == expected, "stage was {}", err.stage());
    ensure!(
        err.to_string().starts_with(&format!("failed to {expected}: ")),
        "message was {err}"
    );
    Ok(())
}

#[test]
fn wrapped_errors_keep_their_kind() -> Result<()> {
    let app = EnvApp::new("app");
    let err: AppError = app
        .unmarshal(["APP_POOL_SIZE=-3"], &mut Settings::default())
        .err()
        .ok_or_else(|| anyhow!("negative size accepted"))?;
    ensure!(
        matches!(err.kind(), EnvError::Parse { kind: ScalarKind::Uint, .. }),
        "kind was {}",
        err.kind()
    );
    ensure!(err.kind().key() == Some("POOL_SIZE"), "key was {:?}", err.kind().key());
    ensure!(
        matches!(err.into_inner(), EnvError::Parse { .. }),
        "into_inner changed the error"
    );
    Ok(())
}

#[test]
fn view_renders_sorted_lines() -> Result<()> {
    let app = EnvApp::new("app");
    let settings = Settings {
        name: "z".to_owned(),
        pool: Pool {
            size: 1,
            ready: true,
        },
        mirrors: vec!["m".to_owned()],
        proxy: None,
    };
    let view = app.view(&settings)?;
    ensure!(
        view == "APP_MIRRORS_0=m\nAPP_NAME=z\nAPP_POOL_SIZE=1\n",
        "view was {view}"
    );
    Ok(())
}

#[test]
fn unmarshal_env_reads_the_process_environment() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("JAILED_POOL_SIZE", "5");
        jail.set_env("JAILED_MIRRORS_0", "env");
        let app = EnvApp::new("jailed");
        let mut settings = Settings::default();
        app.unmarshal_env(&mut settings)
            .map_err(|err| figment::Error::from(err.to_string()))?;
        assert_eq!(settings.pool.size, 5);
        assert!(settings.pool.ready);
        assert_eq!(settings.mirrors, ["env"]);
        Ok(())
    });
}
