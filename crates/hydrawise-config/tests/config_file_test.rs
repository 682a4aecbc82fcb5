// Config file round trips through a temporary directory.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use hydrawise_config::{Config, Profile, load_config_from, save_config_to};

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.default_profile.as_deref(), Some("default"));
    assert_eq!(cfg.defaults.output, "table");
    assert_eq!(cfg.defaults.timeout, 30);
    assert!(cfg.profiles.is_empty());
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut cfg = Config::default();
    cfg.default_profile = Some("garden".into());
    cfg.profiles.insert(
        "garden".into(),
        Profile {
            token_env: Some("GARDEN_TOKEN".into()),
            timeout: Some(10),
            ..Profile::default()
        },
    );
    cfg.profiles.insert("cabin".into(), Profile::default());
    save_config_to(&cfg, &path).unwrap();

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded.default_profile.as_deref(), Some("garden"));
    assert_eq!(loaded.profile_names(), vec!["cabin", "garden"]);
    let garden = &loaded.profiles["garden"];
    assert_eq!(garden.token_env.as_deref(), Some("GARDEN_TOKEN"));
    assert_eq!(garden.timeout, Some(10));
    assert_eq!(garden.token, None);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "profiles = 7\n").unwrap();

    let err = load_config_from(&path).unwrap_err();
    assert!(err.to_string().contains("config loading failed"), "{err}");
}
