//! Configuration system tests
//!
//! Tests for config paths and persisted app settings.

use sumi::config::AppConfig;
use sumi::config_paths;
use sumi::encoding::Eol;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_returns_some() {
    assert!(config_paths::config_dir().is_some());
}

#[test]
fn test_config_dir_contains_app_name() {
    let dir = config_paths::config_dir().unwrap();
    assert!(dir.to_string_lossy().contains("sumi"));
}

#[test]
fn test_config_dir_uses_dot_config_on_unix() {
    #[cfg(not(target_os = "windows"))]
    {
        let dir = config_paths::config_dir().unwrap();
        assert!(
            dir.to_string_lossy().contains(".config"),
            "Expected .config in path, got: {}",
            dir.display()
        );
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    let path = config_paths::config_file().unwrap();
    assert!(path.to_string_lossy().ends_with("config.yaml"));
}

#[test]
fn test_recent_files_path_ends_with_json() {
    let path = config_paths::recent_files_path().unwrap();
    assert!(path.to_string_lossy().ends_with("recent.json"));
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    let config = config_paths::config_dir().unwrap();
    let logs = config_paths::logs_dir().unwrap();
    assert!(logs.starts_with(&config));
}

// ========================================================================
// App Config Tests
// ========================================================================

#[test]
fn test_default_config() {
    let config = AppConfig::default();
    assert!(config.prefer_utf8);
    assert_eq!(config.size_guard_ratio, 0.5);
    assert_eq!(config.default_eol, Eol::Lf);
    assert_eq!(config.theme, "paper-light");
}

#[test]
fn test_config_serialize_deserialize() {
    let config = AppConfig {
        prefer_utf8: false,
        size_guard_ratio: 0.25,
        default_eol: Eol::Crlf,
        theme: "ink-dark".to_string(),
    };
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
    assert!(!parsed.prefer_utf8);
    assert_eq!(parsed.size_guard_ratio, 0.25);
    assert_eq!(parsed.default_eol, Eol::Crlf);
    assert_eq!(parsed.theme, "ink-dark");
}

#[test]
fn test_partial_yaml_fills_in_defaults() {
    let parsed: AppConfig = serde_yaml::from_str("prefer_utf8: false\n").unwrap();
    assert!(!parsed.prefer_utf8);
    assert_eq!(parsed.size_guard_ratio, 0.5);
    assert_eq!(parsed.theme, "paper-light");
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    let config = AppConfig {
        prefer_utf8: false,
        size_guard_ratio: 0.75,
        default_eol: Eol::Crlf,
        theme: "ink-dark".to_string(),
    };
    config.save_to(&path).unwrap();

    let loaded = AppConfig::load_from(&path);
    assert!(!loaded.prefer_utf8);
    assert_eq!(loaded.size_guard_ratio, 0.75);
    assert_eq!(loaded.default_eol, Eol::Crlf);
}

#[test]
fn test_missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = AppConfig::load_from(&dir.path().join("nope.yaml"));
    assert!(loaded.prefer_utf8);
}

#[test]
fn test_garbage_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, ":: not yaml {{{{").unwrap();
    let loaded = AppConfig::load_from(&path);
    assert!(loaded.prefer_utf8);
    assert_eq!(loaded.theme, "paper-light");
}
