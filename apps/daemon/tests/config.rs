//! Daemon configuration tests.

use deepspaced::config::{self, CONFIG_FILE, DEFAULT_ADDR, DaemonConfig};

#[test]
fn default_config_round_trips() {
    let toml = toml::to_string_pretty(&DaemonConfig::default()).unwrap();
    let config = DaemonConfig::from_toml(&toml).unwrap();
    assert_eq!(config.model, "qwen-plus");
    assert_eq!(config.addr, DEFAULT_ADDR);
    assert!(config.base_url.is_none());
}

#[test]
fn missing_addr_falls_back_to_default() {
    let config = DaemonConfig::from_toml(
        r#"
model = "qwen-plus"
api_key = "sk-test"
"#,
    )
    .unwrap();
    assert_eq!(config.addr, DEFAULT_ADDR);
}

#[test]
fn env_reference_expands_in_api_key() {
    unsafe { std::env::set_var("DEEPSPACE_CONFIG_TEST_KEY", "sk-from-env") };
    let config = DaemonConfig::from_toml(
        r#"
model = "qwen-plus"
api_key = "${DEEPSPACE_CONFIG_TEST_KEY}"
"#,
    )
    .unwrap();
    assert_eq!(config.api_key, "sk-from-env");
}

#[test]
fn scaffold_writes_loadable_config() {
    let dir = tempfile::tempdir().unwrap();
    config::scaffold(dir.path()).unwrap();

    let path = dir.path().join(CONFIG_FILE);
    assert!(path.exists());
    let config = DaemonConfig::load(&path).unwrap();
    assert_eq!(config.model, "qwen-plus");
}
