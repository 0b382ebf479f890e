//! Configuration directory layouts used across the integration tests

#![allow(dead_code)] // Not every test file uses every layout

use light_config::ConfigStoreOptions;
use light_config_test_utils::ConfigFixture;

pub const LOCAL_CONFIG: &str = r#"{
    "name": "light-config-local",
    "db": {
        "username": "user-lOVx1VJiEP",
        "password": "pwd-VITOlv5aPU"
    },
    "tags": ["tag1", "tag2"]
}"#;

pub const LOCAL_EXTRA_CONFIG: &str = r#"{
    "name": "extraConfig",
    "db": {
        "username": "user-LJ7tXjYsF5",
        "password": "pwd-LJ7tXjYsF5"
    },
    "extra": "extra-LJ7tXjYsF5"
}"#;

pub const BAD_CONFIG: &str = r#"{
    "name": "bad",
    "db": {
        "username": "user-lOVx1VJiEP",
        "password": 123
    }
}"#;

pub const EXTRA_CONFIG: &str = r#"{
    "name": "extra-config",
    "db": {
        "username": "user-LJ7tXjYsF5",
        "password": "pwd-LJ7tXjYsF5"
    },
    "extra": "extra-LJ7tXjYsF5"
}"#;

/// Every field of `BadConfigData` broken in a different way
pub const VERY_BAD_CONFIG: &str = r#"{
    "name": "bad1",
    "key64": "not base64!",
    "extra": {
        "name": "bad",
        "db": {"username": "user-vbc", "password": false},
        "extra": 7
    },
    "db": {"username": 12},
    "city": 42
}"#;

pub const TEST_YAML_APP: &str = "name: test-yaml/app.yaml\nfp8TestVal: \"{{ENV.FP8_TEST_VAL}}\"\n";
pub const TEST_YAML_CONFIG: &str = "name: \"{{app.name}}-config\"\n";
pub const TEST_YAML_EXTRA: &str = "name: extra\nentry: \"{{config.name}}\"\n";

/// Build the shared layout:
///
/// ```text
/// etc/
///   bad-config.json  extra-config.json  very-bad-config.json  utest.json
///   local/       config.json  extraConfig.json  badConfig.json
///   utest/       app.json
///   utest-simple/config.json
///   test-yaml/   app.yaml  config.yaml  extra.yaml
/// config/
///   test/        config.json
/// ```
pub fn standard_layout() -> ConfigFixture {
    let fixture = ConfigFixture::new().unwrap();

    fixture.write("etc/local/config.json", LOCAL_CONFIG).unwrap();
    fixture.write("etc/local/extraConfig.json", LOCAL_EXTRA_CONFIG).unwrap();
    fixture.write("etc/local/badConfig.json", BAD_CONFIG).unwrap();

    fixture.write("etc/bad-config.json", BAD_CONFIG).unwrap();
    fixture.write("etc/extra-config.json", EXTRA_CONFIG).unwrap();
    fixture.write("etc/very-bad-config.json", VERY_BAD_CONFIG).unwrap();
    fixture.write("etc/utest.json", r#"{"name": "etc/utest.json"}"#).unwrap();

    fixture.write("etc/utest/app.json", r#"{"name": "etc/utest/app.json"}"#).unwrap();
    fixture.write("etc/utest-simple/config.json", r#"{"port": 9589}"#).unwrap();

    fixture.write("etc/test-yaml/app.yaml", TEST_YAML_APP).unwrap();
    fixture.write("etc/test-yaml/config.yaml", TEST_YAML_CONFIG).unwrap();
    fixture.write("etc/test-yaml/extra.yaml", TEST_YAML_EXTRA).unwrap();

    fixture.write("config/test/config.json", r#"{"name": "config/test/config.json"}"#).unwrap();

    fixture
}

/// Options rooted at the fixture with an empty, explicit environment
pub fn options(fixture: &ConfigFixture) -> ConfigStoreOptions {
    ConfigStoreOptions::new()
        .with_base_dir(fixture.root())
        .with_env_vars(Vec::<(String, String)>::new())
}
