use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Remote event store config
    #[serde(default)]
    pub store: StoreConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Model name used for batch translation
    #[serde(default = "default_model")]
    pub model: String,

    /// API key, falls back to the OPENAI_API_KEY environment variable
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Chat-completions endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Number of titles submitted per API call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Number of batches translated concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Maximum completion tokens per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Rate limit in requests per minute (optional)
    ///
    /// This controls the maximum number of requests sent to the API per
    /// minute, on top of the worker-count backpressure. None disables
    /// client-side pacing; the worker count stays the primary control.
    #[serde(default)]
    pub rate_limit: Option<u32>,

    /// Optional prompt-library file with id-keyed sections
    #[serde(default = "default_prompt_file")]
    pub prompt_file: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            batch_size: default_batch_size(),
            workers: default_workers(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            rate_limit: None,
            prompt_file: default_prompt_file(),
        }
    }
}

impl TranslationConfig {
    /// Get the API key, preferring the config value over the environment
    pub fn resolve_api_key(&self) -> String {
        if !self.api_key.is_empty() {
            return self.api_key.clone();
        }
        std::env::var("OPENAI_API_KEY").unwrap_or_default()
    }
}

/// Remote event store (Supabase/PostgREST) configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoreConfig {
    /// Store base URL, falls back to the SUPABASE_URL environment variable
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Store API key, falls back to the SUPABASE_KEY environment variable
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Table holding the event records
    #[serde(default = "default_table")]
    pub table: String,

    /// Page size for paginated fetches
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Chunk size for `title in (...)` cache lookups
    #[serde(default = "default_cache_query_size")]
    pub cache_query_size: usize,

    /// Chunk size for bulk upserts
    #[serde(default = "default_upsert_chunk_size")]
    pub upsert_chunk_size: usize,

    /// Retry count for failed store calls
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff step for store retries (in milliseconds, grows linearly)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            table: default_table(),
            page_size: default_page_size(),
            cache_query_size: default_cache_query_size(),
            upsert_chunk_size: default_upsert_chunk_size(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl StoreConfig {
    /// Get the store URL, preferring the config value over the environment
    pub fn resolve_endpoint(&self) -> String {
        if !self.endpoint.is_empty() {
            return self.endpoint.clone();
        }
        std::env::var("SUPABASE_URL").unwrap_or_default()
    }

    /// Get the store API key, preferring the config value over the environment
    pub fn resolve_api_key(&self) -> String {
        if !self.api_key.is_empty() {
            return self.api_key.clone();
        }
        std::env::var("SUPABASE_KEY").unwrap_or_default()
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_batch_size() -> usize {
    100
}

fn default_workers() -> usize {
    4
}

fn default_max_tokens() -> u32 {
    5000
}

fn default_temperature() -> f32 {
    0.3
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_prompt_file() -> String {
    "prompts.json".to_string()
}

fn default_table() -> String {
    "poly_events".to_string()
}

fn default_page_size() -> usize {
    1000
}

fn default_cache_query_size() -> usize {
    200
}

fn default_upsert_chunk_size() -> usize {
    500
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.translation.resolve_api_key().is_empty() {
            return Err(anyhow!(
                "Translation API key is required (set OPENAI_API_KEY or translation.api_key)"
            ));
        }

        if self.store.resolve_endpoint().is_empty() {
            return Err(anyhow!(
                "Store endpoint is required (set SUPABASE_URL or store.endpoint)"
            ));
        }

        if self.store.resolve_api_key().is_empty() {
            return Err(anyhow!(
                "Store API key is required (set SUPABASE_KEY or store.api_key)"
            ));
        }

        if self.translation.batch_size == 0 {
            return Err(anyhow!("translation.batch_size must be at least 1"));
        }

        if self.translation.workers == 0 {
            return Err(anyhow!("translation.workers must be at least 1"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            translation: TranslationConfig::default(),
            store: StoreConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
