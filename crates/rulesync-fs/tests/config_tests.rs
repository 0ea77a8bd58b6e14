use pretty_assertions::assert_eq;
use rulesync_fs::{ConfigStore, Error, NormalizedPath};
use serde::Deserialize;
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Deserialize, PartialEq)]
struct Sample {
    max_chars: usize,
    rules: Vec<String>,
}

fn expected() -> Sample {
    Sample {
        max_chars: 12000,
        rules: vec!["agents-md.md".into()],
    }
}

#[test]
fn test_load_toml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("rulesync.toml");
    fs::write(&path, "max_chars = 12000\nrules = [\"agents-md.md\"]\n").unwrap();

    let loaded: Sample = ConfigStore::new().load(&NormalizedPath::new(&path)).unwrap();
    assert_eq!(loaded, expected());
}

#[test]
fn test_load_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("rulesync.json");
    fs::write(&path, r#"{"max_chars": 12000, "rules": ["agents-md.md"]}"#).unwrap();

    let loaded: Sample = ConfigStore::new().load(&NormalizedPath::new(&path)).unwrap();
    assert_eq!(loaded, expected());
}

#[test]
fn test_load_yaml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("rulesync.yml");
    fs::write(&path, "max_chars: 12000\nrules:\n  - agents-md.md\n").unwrap();

    let loaded: Sample = ConfigStore::new().load(&NormalizedPath::new(&path)).unwrap();
    assert_eq!(loaded, expected());
}

#[test]
fn test_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("rulesync.ini");
    fs::write(&path, "max_chars=1").unwrap();

    let err = ConfigStore::new()
        .load::<Sample>(&NormalizedPath::new(&path))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { ref extension } if extension == "ini"));
}

#[test]
fn test_parse_error_names_format() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("rulesync.toml");
    fs::write(&path, "max_chars = \"lots\"").unwrap();

    let err = ConfigStore::new()
        .load::<Sample>(&NormalizedPath::new(&path))
        .unwrap_err();
    match err {
        Error::ConfigParse { format, .. } => assert_eq!(format, "TOML"),
        other => panic!("expected ConfigParse, got {:?}", other),
    }
}
