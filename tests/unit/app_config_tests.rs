/*!
 * Tests for application configuration loading and validation
 */

use polyko::app_config::{Config, LogLevel};

use crate::common::{create_temp_dir, create_test_file};

fn config_with_credentials() -> Config {
    let mut config = Config::default();
    config.translation.api_key = "test-api-key".to_string();
    config.store.endpoint = "https://example.supabase.co".to_string();
    config.store.api_key = "test-store-key".to_string();
    config
}

#[test]
fn test_config_default_shouldUseTunedBatchConstants() {
    let config = Config::default();

    assert_eq!(config.translation.model, "gpt-4o-mini");
    assert_eq!(config.translation.batch_size, 100);
    assert_eq!(config.translation.workers, 4);
    assert_eq!(config.translation.retry_count, 3);
    assert_eq!(config.translation.retry_backoff_ms, 1000);
    assert_eq!(config.store.table, "poly_events");
    assert_eq!(config.store.page_size, 1000);
    assert_eq!(config.store.cache_query_size, 200);
    assert_eq!(config.store.upsert_chunk_size, 500);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_config_validate_withCredentials_shouldPass() {
    let config = config_with_credentials();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validate_withZeroBatchSize_shouldFail() {
    let mut config = config_with_credentials();
    config.translation.batch_size = 0;

    let error = config.validate().unwrap_err().to_string();
    assert!(error.contains("batch_size"));
}

#[test]
fn test_config_validate_withZeroWorkers_shouldFail() {
    let mut config = config_with_credentials();
    config.translation.workers = 0;

    let error = config.validate().unwrap_err().to_string();
    assert!(error.contains("workers"));
}

#[test]
fn test_config_roundTrip_shouldPreserveAllFields() {
    let temp_dir = create_temp_dir().unwrap();
    let dir_path = temp_dir.path().to_path_buf();

    let mut config = config_with_credentials();
    config.translation.workers = 7;
    config.translation.rate_limit = Some(45);
    config.store.upsert_chunk_size = 250;

    let json = serde_json::to_string_pretty(&config).unwrap();
    let config_path = create_test_file(&dir_path, "conf.json", &json).unwrap();

    let loaded: Config =
        serde_json::from_str(&std::fs::read_to_string(config_path).unwrap()).unwrap();

    assert_eq!(loaded.translation.workers, 7);
    assert_eq!(loaded.translation.rate_limit, Some(45));
    assert_eq!(loaded.store.upsert_chunk_size, 250);
}

#[test]
fn test_config_fromPartialJson_shouldFillDefaults() {
    let json = r#"{"translation": {"model": "gpt-4o", "api_key": "k"}}"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.translation.model, "gpt-4o");
    assert_eq!(config.translation.batch_size, 100);
    assert_eq!(config.store.table, "poly_events");
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_config_resolveApiKey_shouldPreferConfigValue() {
    let mut config = Config::default();
    config.translation.api_key = "from-config".to_string();

    assert_eq!(config.translation.resolve_api_key(), "from-config");
}
