use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use filecollect::config::Config;
use filecollect::scanner::FileCategory;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .extract()
        .unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.min_match, 2);
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
min_match = 3
image_folders = true
output_dir = "/srv/merged"
categories = ["images", "videos"]
"#,
    )
    .unwrap();

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract()
        .unwrap();

    assert_eq!(config.min_match, 3);
    assert!(config.image_folders);
    assert!(!config.skip_hidden);
    assert_eq!(config.output_dir, Some(PathBuf::from("/srv/merged")));
    assert_eq!(
        config.categories,
        vec![FileCategory::Images, FileCategory::Videos]
    );
}

#[test]
fn test_config_env_overrides_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "follow_symlinks = false\n").unwrap();

    std::env::set_var("FCTEST_FOLLOW_SYMLINKS", "true");
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .merge(Env::prefixed("FCTEST_").split("__"))
        .extract()
        .unwrap();
    std::env::remove_var("FCTEST_FOLLOW_SYMLINKS");

    assert!(config.follow_symlinks);
}

#[test]
fn test_config_load_from_explicit_path() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(&config_path, "skip_hidden = true\n").unwrap();

    let config = Config::load_from(Some(&config_path)).unwrap();
    assert!(config.skip_hidden);
}

#[test]
fn test_config_save_and_reload() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("nested/config.toml");

    let config = Config {
        min_match: 5,
        categories: vec![FileCategory::Audio],
        ..Config::default()
    };
    config.save_to(&config_path).unwrap();

    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("min_match = 5"));
    assert!(saved.contains("categories = [\"audio\"]"));
    assert!(!saved.contains("output_dir"));

    let reloaded: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract()
        .unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn test_config_invalid_toml_is_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "min_match = \"many\"").unwrap();

    assert!(Config::load_from(Some(&config_path)).is_err());
}
