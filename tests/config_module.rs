use postforge::config::{
    ConfigError, Settings, DEFAULT_API_BASE, DEFAULT_API_KEY_ENV, DEFAULT_MAX_REFINEMENT_PASSES,
};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn settings_load_from_yaml_with_defaults_applied() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("postforge.yaml");
    fs::write(
        &path,
        r#"
model: gemini-2.0-flash-exp
max_refinement_passes: 2
state_root: /tmp/postforge-state
"#,
    )
    .expect("write settings");

    let settings = Settings::load(&path).expect("load settings");
    assert_eq!(settings.model, "gemini-2.0-flash-exp");
    assert_eq!(settings.max_refinement_passes, 2);
    assert_eq!(settings.state_root, PathBuf::from("/tmp/postforge-state"));
    assert_eq!(settings.api_base, DEFAULT_API_BASE);
    assert_eq!(settings.api_key_env, DEFAULT_API_KEY_ENV);
}

#[test]
fn empty_settings_file_yields_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("postforge.yaml");
    fs::write(&path, "{}\n").expect("write settings");

    let settings = Settings::load(&path).expect("load settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(
        settings.max_refinement_passes,
        DEFAULT_MAX_REFINEMENT_PASSES
    );
}

#[test]
fn invalid_values_fail_validation_on_load() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("postforge.yaml");
    fs::write(&path, "max_refinement_passes: 0\n").expect("write settings");

    match Settings::load(&path) {
        Err(ConfigError::Validation(reason)) => {
            assert!(reason.contains("max_refinement_passes"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn missing_file_and_bad_yaml_map_to_distinct_errors() {
    let dir = tempdir().expect("tempdir");

    let missing = Settings::load(&dir.path().join("absent.yaml"));
    assert!(matches!(missing, Err(ConfigError::Io { .. })));

    let path = dir.path().join("broken.yaml");
    fs::write(&path, "model: [unclosed\n").expect("write settings");
    assert!(matches!(
        Settings::load(&path),
        Err(ConfigError::Yaml { .. })
    ));
}
