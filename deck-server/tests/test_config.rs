//! Server configuration tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use deck_server::config::{ServerConfig, DEFAULT_BIND_ADDR};
use deck_service::DeckError;

fn from_pairs(pairs: &[(&str, &str)]) -> Result<ServerConfig, DeckError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ServerConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn empty_environment_uses_defaults() {
    let config = from_pairs(&[]).unwrap();
    assert_eq!(config, ServerConfig::default());
    assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    assert_eq!(config.command_timeout, Some(Duration::from_secs(30)));
}

#[test]
fn variables_override_defaults() {
    let config = from_pairs(&[
        ("DECK_BIND_ADDR", "127.0.0.1:9000"),
        ("DECK_DB_PATH", "/tmp/decks.duckdb"),
        ("DECK_STATIC_DIR", "/srv/cards"),
        ("DECK_COMMAND_TIMEOUT_MS", "250"),
        ("DECK_QUEUE_CAPACITY", "16"),
    ])
    .unwrap();

    assert_eq!(config.bind_addr, "127.0.0.1:9000");
    assert_eq!(config.db_path, PathBuf::from("/tmp/decks.duckdb"));
    assert_eq!(config.static_dir, PathBuf::from("/srv/cards"));
    assert_eq!(config.command_timeout, Some(Duration::from_millis(250)));
    assert_eq!(config.queue_capacity, 16);
}

#[test]
fn zero_timeout_disables_it() {
    let config = from_pairs(&[("DECK_COMMAND_TIMEOUT_MS", "0")]).unwrap();
    assert_eq!(config.command_timeout, None);
}

#[test]
fn blank_values_are_ignored() {
    let config = from_pairs(&[("DECK_BIND_ADDR", "  ")]).unwrap();
    assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
}

#[test]
fn invalid_numbers_are_config_errors() {
    for pairs in [
        [("DECK_COMMAND_TIMEOUT_MS", "soon")],
        [("DECK_QUEUE_CAPACITY", "-3")],
        [("DECK_QUEUE_CAPACITY", "0")],
    ] {
        assert!(matches!(from_pairs(&pairs), Err(DeckError::Config(_))));
    }
}

#[tokio::test]
async fn service_builder_opens_configured_path() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("data").join("decks.duckdb");
    let config = from_pairs(&[("DECK_DB_PATH", db_path.to_str().unwrap())]).unwrap();

    let service = config.service_builder().build().unwrap();

    assert_eq!(service.db_path(), Some(db_path.clone()));
    assert!(db_path.exists());
    service.close().await.unwrap();
}
