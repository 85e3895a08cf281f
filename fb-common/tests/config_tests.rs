//! Config file loading tests
//!
//! Covers:
//! - Explicit config file is read and parsed
//! - Malformed TOML is reported, not silently ignored
//! - An explicit path that does not exist is an error

use fb_common::config::{CliOverrides, ServiceConfig, TomlConfig};
use fb_common::Error;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Should create temp file");
    file.write_all(content.as_bytes())
        .expect("Should write temp file");
    file
}

#[test]
fn test_load_explicit_file() {
    let file = write_config(
        r#"
        database_path = "/tmp/fb-test/reviews.db"

        [logging]
        level = "debug"

        [analysis]
        base_url = "http://127.0.0.1:9999/v1"
        max_tokens = 64
        "#,
    );

    let config = TomlConfig::load_or_default(Some(file.path())).unwrap();

    assert_eq!(
        config.database_path,
        Some(PathBuf::from("/tmp/fb-test/reviews.db"))
    );
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.analysis.base_url, "http://127.0.0.1:9999/v1");
    assert_eq!(config.analysis.max_tokens, 64);
    assert!(config.analysis.credential().is_none());
}

#[test]
fn test_malformed_file_is_config_error() {
    let file = write_config("bind = [not valid toml");

    let result = TomlConfig::load(file.path());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_missing_explicit_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let result = TomlConfig::load_or_default(Some(&path));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_resolved_config_from_file() {
    let file = write_config(
        r#"
        bind = "0.0.0.0:4100"

        [analysis]
        api_key = "sk-file"
        "#,
    );

    let toml = TomlConfig::load(file.path()).unwrap();
    let config = ServiceConfig::resolve(toml, CliOverrides::default());

    assert_eq!(config.bind, "0.0.0.0:4100");
    assert_eq!(config.analysis.credential(), Some("sk-file"));
    assert!(config.database_path.ends_with("reviews.db"));
}
