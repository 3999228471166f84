//! Unit tests for ServerConfig

use depot_server::ServerConfig;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_from_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.yaml");
    std::fs::write(
        &path,
        "settings_path: /etc/depot/depot.yaml\nflush_interval_secs: 5\n",
    )
    .unwrap();

    let config = ServerConfig::from_file(&path).unwrap();

    assert_eq!(config.settings_path, PathBuf::from("/etc/depot/depot.yaml"));
    assert_eq!(config.flush_interval(), Duration::from_secs(5));
    // Omitted keys keep their defaults
    assert_eq!(config.log_level, "info");
    assert!(config.write_default_settings);
}

#[test]
fn test_from_file_rejects_wrong_types() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.yaml");
    std::fs::write(&path, "flush_interval_secs: often\n").unwrap();

    let err = ServerConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("server.yaml"));
}

#[test]
fn test_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ServerConfig::from_file(dir.path().join("absent.yaml")).is_err());
}
