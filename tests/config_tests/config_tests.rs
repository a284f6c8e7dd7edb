//! Tests for Config
//!
//! These tests verify:
//! - Builder overrides
//! - `home()` roots every default path
//! - Default modes

use std::path::PathBuf;

use bboltci::config::{Config, INSTALL_MODE, OPEN_MODE};

#[test]
fn test_home_roots_all_paths() {
    let config = Config::builder().home("/tmp/somewhere").build();

    assert_eq!(config.config_dir, PathBuf::from("/tmp/somewhere/.config"));
    assert_eq!(config.app_dir, PathBuf::from("/tmp/somewhere/.config/bbolt-ci"));
    assert_eq!(
        config.db_path(),
        PathBuf::from("/tmp/somewhere/.config/bbolt-ci/local.bbolt")
    );
}

#[test]
fn test_default_modes() {
    let config = Config::builder().home("/h").build();

    assert_eq!(config.open_mode, OPEN_MODE);
    assert_eq!(config.install_mode, INSTALL_MODE);
    assert_eq!(OPEN_MODE, 0o400);
    assert_eq!(INSTALL_MODE, 0o700);
}

#[test]
fn test_builder_overrides() {
    let config = Config::builder()
        .home("/h")
        .db_path("/data/other.bbolt")
        .open_mode(0o600)
        .install_mode(0o750)
        .build();

    assert_eq!(config.db_path, PathBuf::from("/data/other.bbolt"));
    assert_eq!(config.app_dir, PathBuf::from("/h/.config/bbolt-ci"));
    assert_eq!(config.open_mode, 0o600);
    assert_eq!(config.install_mode, 0o750);
}

#[test]
fn test_explicit_dirs() {
    let config = Config::builder()
        .config_dir("/c")
        .app_dir("/c/app")
        .db_path("/c/app/db")
        .build();

    assert_eq!(config.config_dir, PathBuf::from("/c"));
    assert_eq!(config.app_dir, PathBuf::from("/c/app"));
    assert_eq!(config.db_path, PathBuf::from("/c/app/db"));
}

#[test]
fn test_from_env_uses_default_file_name() {
    let config = Config::from_env();

    assert!(config.db_path.ends_with(".config/bbolt-ci/local.bbolt"));
    assert!(config.app_dir.ends_with(".config/bbolt-ci"));
}
