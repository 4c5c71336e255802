//! End-to-end behaviour of the persisted configuration store.

use runagents_config::{ConfigError, ConfigKey, ConfigRecord, ConfigStore, DEFAULT_ENDPOINT};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> ConfigStore {
    ConfigStore::at(dir.path().join(".runagents").join("config.json"))
}

#[test]
fn fresh_environment_yields_default_record() {
    let dir = TempDir::new().expect("tempdir");
    let record = store_in(&dir).load().expect("load defaults");
    assert_eq!(record.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(record.api_key, "");
}

#[test]
fn set_and_save_persists_across_loads() {
    let dir = TempDir::new().expect("tempdir");
    let store = store_in(&dir);

    let mut record = store.load().expect("initial load");
    record
        .set(ConfigKey::Endpoint, "https://x.test")
        .expect("set endpoint");
    store.save(&record).expect("first save");

    let mut reloaded = store.load().expect("second load");
    assert_eq!(reloaded.endpoint, "https://x.test");
    reloaded
        .set(ConfigKey::ApiKey, "abcd1234efgh")
        .expect("set key");
    store.save(&reloaded).expect("second save");

    assert_eq!(
        store.load().expect("final load"),
        ConfigRecord {
            endpoint: "https://x.test".into(),
            api_key: "abcd1234efgh".into(),
        }
    );
}

#[test]
fn partial_file_keeps_empty_endpoint() {
    let dir = TempDir::new().expect("tempdir");
    let store = store_in(&dir);
    std::fs::create_dir_all(dir.path().join(".runagents")).expect("mkdir");
    std::fs::write(store.path(), r#"{"api_key":"k"}"#).expect("write partial");

    let record = store.load().expect("partial file parses");
    assert_eq!(record.endpoint, "");
    assert_eq!(record.api_key, "k");
}

#[test]
fn unreadable_path_reports_io_error() {
    let dir = TempDir::new().expect("tempdir");
    // A directory where the file should be cannot be read as a file.
    let path = dir.path().join("config.json");
    std::fs::create_dir_all(&path).expect("mkdir");
    let err = ConfigStore::at(&path).load().expect_err("directory is not a file");
    assert!(matches!(err, ConfigError::Io { .. }));
}
