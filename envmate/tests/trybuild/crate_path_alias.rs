//! Trybuild fixture verifying `#[envmate(crate = "envmate")]` is accepted.

use envmate::{EnvMarshal, EnvStore};

/// Uses the real crate name as a self-referential alias so no workspace
/// reconfiguration is needed.
#[derive(Debug, Default, PartialEq, EnvMarshal)]
#[envmate(crate = "envmate")]
struct CratePathConfig {
    value: String,
    count: u32,
}

fn main() {
    let mut store = EnvStore::new("demo");
    let config = CratePathConfig {
        value: "hello".to_owned(),
        count: 1,
    };
    let encoded: envmate::EnvResult<()> = store.encode(&config);
    let mut decoded = CratePathConfig::default();
    let outcome: envmate::EnvResult<()> = encoded.and_then(|()| store.decode(&mut decoded));
    assert!(outcome.is_ok());
    assert_eq!(decoded, config);
}
