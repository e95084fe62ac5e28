//! Integration tests for server config parsing.

use std::path::PathBuf;

use thyrisk_classifiers::config::ModelKind;
use thyrisk_classifiers::schema::Variant;
use thyrisk_cli::config::ServerConfig;

// ---------------------------------------------------------------------------
// ServerConfig defaults & serialization
// ---------------------------------------------------------------------------

#[test]
fn server_config_default_values() {
    let cfg = ServerConfig::default();
    assert_eq!(cfg.bind_address, "127.0.0.1:5000");
    assert_eq!(cfg.variant, Variant::Lowercase);
    assert_eq!(cfg.model.kind, ModelKind::Forest);
    assert!(cfg.training_columns.is_none());
}

#[test]
fn server_config_serializes_to_json() {
    let cfg = ServerConfig::default();
    let json = serde_json::to_string_pretty(&cfg).unwrap();
    assert!(json.contains("bind_address"));
    assert!(json.contains("\"variant\": \"lowercase\""));
    assert!(json.contains("\"kind\": \"forest\""));
}

// ---------------------------------------------------------------------------
// ServerConfig::load
// ---------------------------------------------------------------------------

#[test]
fn load_reads_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "bind_address": "0.0.0.0:8080",
            "variant": "dataset",
            "model": {"kind": "xgboost-dump", "path": "model.dump", "threshold": 0.4, "n_features": 16},
            "training_columns": "columns.json"
        }"#,
    )
    .unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.bind_address, "0.0.0.0:8080");
    assert_eq!(cfg.variant, Variant::Dataset);
    assert_eq!(cfg.model.kind, ModelKind::XgboostDump);
    assert_eq!(cfg.model.path, PathBuf::from("model.dump"));
    assert_eq!(cfg.model.threshold, 0.4);
    assert_eq!(cfg.model.n_features, Some(16));
    assert_eq!(cfg.training_columns, Some(PathBuf::from("columns.json")));

    let pipeline = cfg.pipeline_config();
    assert_eq!(pipeline.variant, Variant::Dataset);
    assert_eq!(pipeline.training_columns, Some(PathBuf::from("columns.json")));
}

#[test]
fn load_keeps_defaults_for_missing_and_invalid_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"variant": "zebra", "bind_address": "10.0.0.1:9000"}"#).unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.variant, Variant::Lowercase);
    assert_eq!(cfg.bind_address, "10.0.0.1:9000");
    assert_eq!(cfg.model, ServerConfig::default().model);
}

#[test]
fn load_rejects_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(ServerConfig::load(&path).is_err());
    assert!(ServerConfig::load(dir.path().join("missing.json")).is_err());
}
