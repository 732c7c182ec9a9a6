//! Tests for the config module

use super::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const SAMPLE: &str = r#"
kind = "resources"
output = "build/merged"
blob_dir = "build/blob"

[[sets]]
name = "main"
sources = ["src/main/res"]

[[sets]]
name = "overlay"
sources = ["src/debug/res", "/abs/res"]

[merge]
validate_names = false
workers = 3
"#;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.kind, MergeKind::Resources);
    assert_eq!(config.output, PathBuf::from("build/merged"));
    assert!(config.merge.validate_names);
    assert_eq!(config.merge.workers, 0);
    assert!(config.sets.is_empty());
}

#[test]
fn test_config_parse_toml() {
    let config: Config = toml::from_str(SAMPLE).unwrap();
    assert_eq!(config.sets.len(), 2);
    assert_eq!(config.sets[1].name, "overlay");
    assert!(!config.merge.validate_names);
    assert_eq!(config.merge.workers, 3);

    let assets: Config = toml::from_str("kind = \"assets\"").unwrap();
    assert_eq!(assets.kind, MergeKind::Assets);
}

#[test]
fn test_load_resolves_relative_paths() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("resmerge.toml");
    fs::write(&path, SAMPLE).unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.output, dir.path().join("build/merged"));
    assert_eq!(config.blob_dir, dir.path().join("build/blob"));
    assert_eq!(config.project_root.as_deref(), Some(dir.path()));
    assert_eq!(config.sets[0].sources, [dir.path().join("src/main/res")]);
    assert_eq!(config.sets[1].sources[1], PathBuf::from("/abs/res"));
}

#[test]
fn test_unknown_keys_are_warnings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("resmerge.toml");
    fs::write(&path, "kind = \"assets\"\nouptut = \"x\"\n\n[merge]\nworkerz = 2\n").unwrap();

    let (config, warnings) = load_with_warnings(&path).unwrap();
    assert_eq!(config.kind, MergeKind::Assets);
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0].key, "ouptut");
    assert_eq!(warnings[0].line, Some(2));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("output"));
    assert_eq!(warnings[1].suggestion.as_deref(), Some("workers"));
    assert!(warnings[0]
        .to_string()
        .ends_with(":2: unknown config key 'ouptut' (did you mean 'output'?)"));
}

#[test]
fn test_invalid_toml_is_a_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("resmerge.toml");
    fs::write(&path, "kind = \"bitmaps\"").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(err.to_string().contains("invalid configuration"));
}

#[test]
fn test_validate_rejects_bad_sets() {
    let file = Path::new("resmerge.toml");
    let mut config = Config::default();
    assert!(config.validate(file).is_err());

    config.sets = vec![SetConfig::new("main", ["a"]), SetConfig::new("main", ["b"])];
    let err = config.validate(file).unwrap_err();
    assert!(err.to_string().contains("set name 'main' is used twice"));

    config.sets = vec![SetConfig::new("main", ["a"]), SetConfig::new("overlay", ["b"])];
    config.validate(file).unwrap();
}

#[test]
fn test_env_overrides() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("RESMERGE_OUTPUT", "/tmp/out"),
        ("RESMERGE_BLOB_DIR", "/tmp/blob"),
        ("RESMERGE_WORKERS", "4"),
    ]);
    let config = with_overrides_from(Config::default(), |name| env.get(name).map(|v| v.to_string()));
    assert_eq!(config.output, PathBuf::from("/tmp/out"));
    assert_eq!(config.blob_dir, PathBuf::from("/tmp/blob"));
    assert_eq!(config.merge.workers, 4);
}

#[test]
fn test_invalid_worker_override_is_ignored() {
    let config = with_overrides_from(Config::default(), |name| {
        (name == "RESMERGE_WORKERS").then(|| "many".to_string())
    });
    assert_eq!(config.merge.workers, 0);
}

#[test]
fn test_user_config_path_is_namespaced() {
    if let Some(path) = user_config_path() {
        assert!(path.ends_with("resmerge/config.toml"));
    }
}
