//! Save converter against real files.

use std::fs;

use serde_json::{json, Value};
use tempfile::tempdir;

use hopblade::save::{binary_to_json, json_to_binary, SaveError, SAVE_MAGIC};

#[test]
fn json_binary_json_round_trip() {
    let dir = tempdir().unwrap();
    let json_in = dir.path().join("slot1.json");
    let bin = dir.path().join("slot1.sav");
    let json_out = dir.path().join("slot1.out.json");

    let document = json!({
        "version": 3,
        "player": {"x": 640.5, "y": 620, "facing": "left"},
        "flags": [true, false],
        "unlocked": {"snappy": true}
    });
    fs::write(&json_in, serde_json::to_string(&document).unwrap()).unwrap();

    json_to_binary(&json_in, &bin).unwrap();
    let bytes = fs::read(&bin).unwrap();
    assert_eq!(&bytes[..4], &SAVE_MAGIC);

    binary_to_json(&bin, &json_out).unwrap();
    let text = fs::read_to_string(&json_out).unwrap();
    let restored: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(restored, document);
    assert!(text.contains("\n  \"flags\": ["));
}

#[test]
fn missing_input_is_not_found() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.json");

    match json_to_binary(&missing, &dir.path().join("out.sav")) {
        Err(SaveError::NotFound(path)) => assert_eq!(path, missing),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(matches!(
        binary_to_json(&dir.path().join("nope.sav"), &dir.path().join("out.json")),
        Err(SaveError::NotFound(_))
    ));
}

#[test]
fn rejected_documents_write_nothing() {
    let dir = tempdir().unwrap();
    let bin = dir.path().join("out.sav");

    let with_null = dir.path().join("null.json");
    fs::write(&with_null, r#"{"a": null}"#).unwrap();
    assert!(matches!(json_to_binary(&with_null, &bin), Err(SaveError::NullValue(p)) if p == "$.a"));

    let array_root = dir.path().join("array.json");
    fs::write(&array_root, "[1, 2, 3]").unwrap();
    assert!(matches!(json_to_binary(&array_root, &bin), Err(SaveError::RootNotMapping)));

    assert!(!bin.exists());
}

#[test]
fn foreign_binary_is_rejected() {
    let dir = tempdir().unwrap();
    let bin = dir.path().join("foreign.sav");
    fs::write(&bin, b"PK\x03\x04 not a save").unwrap();

    assert!(matches!(
        binary_to_json(&bin, &dir.path().join("out.json")),
        Err(SaveError::BadMagic)
    ));
}
