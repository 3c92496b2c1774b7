use sdd_hub::config::{GlobalConfig, HostConfig, LoggingConfig, ThemeConfig};
use std::path::PathBuf;
use tempfile::TempDir;

// === ThemeConfig Tests ===

#[test]
fn test_parse_hex_valid() {
    assert_eq!(ThemeConfig::parse_hex("#FFFFFF"), Some((255, 255, 255)));
    assert_eq!(ThemeConfig::parse_hex("#000000"), Some((0, 0, 0)));
    assert_eq!(ThemeConfig::parse_hex("#7ee787"), Some((126, 231, 135)));
}

#[test]
fn test_parse_hex_without_hash() {
    assert_eq!(ThemeConfig::parse_hex("ff6b6b"), Some((255, 107, 107)));
}

#[test]
fn test_parse_hex_invalid() {
    assert_eq!(ThemeConfig::parse_hex("#FFF"), None); // Too short
    assert_eq!(ThemeConfig::parse_hex("#FFFFFFF"), None); // Too long
    assert_eq!(ThemeConfig::parse_hex("#GGGGGG"), None); // Invalid hex chars
    assert_eq!(ThemeConfig::parse_hex(""), None);
}

#[test]
fn test_theme_config_default() {
    let theme = ThemeConfig::default();

    // Verify all default colors are valid hex
    for color in [
        &theme.color_selected,
        &theme.color_normal,
        &theme.color_dimmed,
        &theme.color_text,
        &theme.color_ok,
        &theme.color_warning,
        &theme.color_error,
        &theme.color_popup_border,
    ] {
        assert!(ThemeConfig::parse_hex(color).is_some(), "bad default {}", color);
    }
}

// === HostConfig / LoggingConfig Tests ===

#[test]
fn test_host_config_default() {
    let host = HostConfig::default();
    assert_eq!(host.command, "sdd-host");
    assert!(host.args.is_empty());
}

#[test]
fn test_logging_config_default() {
    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.directory.is_none());
}

#[test]
fn test_log_dir_prefers_configured_directory() {
    let mut config = GlobalConfig::default();
    config.logging.directory = Some(PathBuf::from("/var/log/sdd"));
    assert_eq!(config.log_dir().unwrap(), PathBuf::from("/var/log/sdd"));
}

// === Parsing Tests ===

#[test]
fn test_partial_toml_fills_defaults() {
    let toml_str = r#"
        [host]
        command = "node"
        args = ["dist/host.js"]
    "#;
    let config: GlobalConfig = toml::from_str(toml_str).unwrap();

    assert_eq!(config.host.command, "node");
    assert_eq!(config.host.args, vec!["dist/host.js"]);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.theme.color_ok, ThemeConfig::default().color_ok);
}

#[test]
fn test_empty_toml_is_default() {
    let config: GlobalConfig = toml::from_str("").unwrap();
    assert_eq!(config.host.command, "sdd-host");
}

#[test]
fn test_invalid_toml_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[host\ncommand = ").unwrap();
    assert!(GlobalConfig::load_from(&path).is_err());
}

// === Load / Save Tests ===

#[test]
fn test_load_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let config = GlobalConfig::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.host.command, "sdd-host");
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = GlobalConfig::default();
    config.host.command = "python3".to_string();
    config.host.args = vec!["-m".to_string(), "sdd_host".to_string()];
    config.logging.level = "sdd_hub=debug".to_string();
    config.theme.color_error = "#aa0000".to_string();
    config.save_to(&path).unwrap();

    let loaded = GlobalConfig::load_from(&path).unwrap();
    assert_eq!(loaded.host.command, "python3");
    assert_eq!(loaded.host.args, vec!["-m", "sdd_host"]);
    assert_eq!(loaded.logging.level, "sdd_hub=debug");
    assert_eq!(loaded.theme.color_error, "#aa0000");
}

#[test]
fn test_config_path_location() {
    let path = GlobalConfig::config_path().unwrap();
    assert!(path.ends_with(".config/sdd-hub/config.toml"));
}
