use super::{dotenv_failure, load_config};
use super::settings::Settings;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.client.url, "ws://127.0.0.1:8080/");
    assert_eq!(settings.client.client_id, None);
    assert_eq!(settings.client.stream, None);
    assert_eq!(settings.client.poll_interval_ms, 0);
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn load_config_without_sources_uses_defaults() {
    temp_env::with_vars_unset(
        [
            "STREAMLINK__CLIENT__URL",
            "STREAMLINK__CLIENT__CLIENT_ID",
            "STREAMLINK__LOGGING__LEVEL",
        ],
        || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg, Settings::default());
        },
    );
}

#[test]
#[serial]
fn load_config_from_env_overrides_defaults() {
    temp_env::with_vars(
        [
            ("STREAMLINK__CLIENT__URL", Some("ws://10.0.0.5:9000/")),
            ("STREAMLINK__CLIENT__CLIENT_ID", Some("UnityClient1")),
            ("STREAMLINK__CLIENT__POLL_INTERVAL_MS", Some("250")),
            ("STREAMLINK__LOGGING__LEVEL", Some("debug")),
        ],
        || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg.client.url, "ws://10.0.0.5:9000/");
            assert_eq!(cfg.client.client_id.as_deref(), Some("UnityClient1"));
            assert_eq!(cfg.client.poll_interval_ms, 250);
            assert_eq!(cfg.client.stream, None);
            assert_eq!(cfg.logging.level, "debug");
        },
    );
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    // load_config reads config/default.* relative to the current directory
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    fs::create_dir_all("config").expect("create config dir");
    let toml = r#"
        [client]
        url = "ws://192.168.100.157:8080/"
        client_id = "file_client"
        stream = "temp"
    "#;
    fs::write("config/default.toml", toml).expect("write config file");

    let cfg = load_config();

    env::set_current_dir(orig).expect("restore cwd");

    let cfg = cfg.expect("load_config failed");
    assert_eq!(cfg.client.url, "ws://192.168.100.157:8080/");
    assert_eq!(cfg.client.client_id.as_deref(), Some("file_client"));
    assert_eq!(cfg.client.stream.as_deref(), Some("temp"));
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn dotenv_missing_file_is_not_reported() {
    let dir = TempDir::new().unwrap();
    let result = dotenvy::from_path(dir.path().join(".env"));
    assert_eq!(dotenv_failure(result), None);
}

#[test]
#[serial]
fn dotenv_malformed_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".env");
    fs::write(&path, "STREAMLINK__CLIENT__URL ws://nowhere/\n").unwrap();

    temp_env::with_var_unset("STREAMLINK__CLIENT__URL", || {
        let failure =
            dotenv_failure(dotenvy::from_path(&path)).expect("malformed .env reported");
        assert!(failure.starts_with("Failed to load .env:"), "{failure}");
        assert!(env::var("STREAMLINK__CLIENT__URL").is_err());
    });
}
