//! Configuration file loading through the full precedence chain.

use std::io::Write;

use panelfx_core::{ConfigError, EngineConfig, ModeTag};
use panelfx_render::FontSize;

#[test]
fn file_then_env_then_validate() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "width": 32,
            "height": 16,
            "tick_interval_ms": 5,
            "brightness": 70,
            "initial_mode": "life",
            "font": "medium",
            "seed": 7
        }}"#
    )
    .unwrap();

    let mut config = EngineConfig::load(file.path()).unwrap();
    assert_eq!((config.width, config.height), (32, 16));
    assert_eq!(config.initial_mode, ModeTag::Life);
    assert_eq!(config.font, FontSize::Medium);
    assert_eq!(config.seed, Some(7));

    config.apply_env_with(|key| (key == "PANELFX_BRIGHTNESS").then(|| "90".to_string()));
    assert_eq!(config.brightness, 90);

    config.validate();
    assert_eq!(config.tick_interval_ms, EngineConfig::MIN_TICK_INTERVAL_MS);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn malformed_file_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ width: 64 ").unwrap();
    let err = EngineConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().starts_with("config parse error"));
}

#[test]
fn round_trips_through_json() {
    let config = EngineConfig {
        initial_mode: ModeTag::Pacman,
        seed: Some(99),
        ..EngineConfig::default()
    };
    let text = serde_json::to_string_pretty(&config).unwrap();
    assert_eq!(EngineConfig::from_json_str(&text).unwrap(), config);
}
