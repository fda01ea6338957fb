use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use nova_scribe::config::EndpointConfig;
use nova_scribe::storage::SledStorage;

#[allow(dead_code)]
pub fn create_temp_storage() -> (SledStorage, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("sessions.db");
    let storage = SledStorage::open(db_path).expect("failed to open sled storage");
    (storage, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("nova-scribe.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn endpoint_at(base_uri: &str) -> EndpointConfig {
    EndpointConfig {
        url: format!("{}/chat", base_uri),
        timeout_seconds: Some(5),
    }
}
