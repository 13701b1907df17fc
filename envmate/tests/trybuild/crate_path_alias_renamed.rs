//! Trybuild fixture verifying `#[envmate(crate = "...")]` works with a
//! genuine dependency rename via `use ... as`.

use envmate as my_env;
use my_env::{EnvApp, EnvMarshal};

/// Generated code must reference the runtime through `my_env`.
#[derive(Debug, Default, EnvMarshal)]
#[envmate(crate = "my_env")]
struct Inner {
    level: u8,
}

#[derive(Debug, Default, EnvMarshal)]
#[envmate(crate = "my_env")]
struct AliasedConfig {
    #[envmate(flatten)]
    inner: Inner,
    names: Vec<String>,
}

fn main() {
    let mut config = AliasedConfig::default();
    let result: Result<(), my_env::AppError> =
        EnvApp::new("alias").unmarshal(["ALIAS_LEVEL=3", "ALIAS_NAMES_0=a"], &mut config);
    assert!(result.is_ok());
    assert_eq!(config.inner.level, 3);
    assert_eq!(config.names, ["a"]);
}
