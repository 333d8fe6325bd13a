use std::path::{Path, PathBuf};

use pose_arcade::config::*;
use pose_arcade::error::ArcadeError;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("pose_arcade_{}_{}", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn defaults() {
    let c = ArcadeConfig::default();
    assert_eq!(c.frame_ms, 33);
    assert_eq!(c.hold_window, 4);
    assert_eq!(c.catcher_time_limit, 60);
    assert!(c.audio);
    assert!(c.log_file.is_none());
}

#[test]
fn partial_file_keeps_other_defaults() {
    let c = ArcadeConfig::from_toml(Path::new("x.toml"), "frame_ms = 16\naudio = false\n").unwrap();
    assert_eq!(c.frame_ms, 16);
    assert!(!c.audio);
    assert_eq!(c.catcher_time_limit, 60);
}

#[test]
fn log_file_is_a_path() {
    let c = ArcadeConfig::from_toml(Path::new("x.toml"), "log_file = \"arcade.log\"").unwrap();
    assert_eq!(c.log_file, Some(PathBuf::from("arcade.log")));
}

#[test]
fn zero_frame_length_is_rejected() {
    let err = ArcadeConfig::from_toml(Path::new("x.toml"), "frame_ms = 0").unwrap_err();
    assert!(matches!(err, ArcadeError::InvalidConfig { key: "frame_ms", .. }));
    assert_eq!(err.to_string(), "config key 'frame_ms' must be greater than 0");
}

#[test]
fn zero_time_limit_is_rejected() {
    let err = ArcadeConfig::from_toml(Path::new("x.toml"), "catcher_time_limit = 0").unwrap_err();
    assert!(matches!(err, ArcadeError::InvalidConfig { key: "catcher_time_limit", .. }));
}

#[test]
fn malformed_toml_names_the_file() {
    let err = ArcadeConfig::from_toml(Path::new("bad.toml"), "frame_ms = \"fast\"").unwrap_err();
    assert!(matches!(err, ArcadeError::ConfigParse { .. }));
    assert!(err.to_string().starts_with("failed to parse bad.toml"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn missing_file_is_not_an_error() {
    let path = std::env::temp_dir().join("pose_arcade_definitely_missing.toml");
    assert!(try_load_config(&path).unwrap().is_none());
    assert_eq!(load_config(&path), ArcadeConfig::default());
}

#[test]
fn load_reads_the_file() {
    let path = temp_file("good.toml", "hold_window = 6\ncatcher_time_limit = 30\n");
    let c = load_config(&path);
    assert_eq!(c.hold_window, 6);
    assert_eq!(c.catcher_time_limit, 30);
    std::fs::remove_file(path).ok();
}

#[test]
fn invalid_file_falls_back_to_defaults() {
    let path = temp_file("invalid.toml", "frame_ms = 0\n");
    assert!(try_load_config(&path).is_err());
    assert_eq!(load_config(&path), ArcadeConfig::default());
    std::fs::remove_file(path).ok();
}
