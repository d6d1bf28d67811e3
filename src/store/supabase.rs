/*!
 * PostgREST client for the remote event table.
 *
 * All reads are paginated, cache lookups are chunked to respect query-size
 * limits, and writes are chunked with per-chunk retry so one failing chunk
 * never blocks the rest of a run.
 */

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, error, warn};
use reqwest::Client;
use url::Url;

use crate::app_config::StoreConfig;
use crate::errors::StoreError;
use super::models::{CachedTranslation, EventRecord, TranslationUpdate};

/// Filter for a paginated event fetch
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Inclusive lower bound on `end_date`
    pub start_date: String,

    /// Exclusive upper bound on `end_date`
    pub end_date: String,

    /// Only fetch rows whose `title_ko` is still null
    pub untranslated_only: bool,

    /// Skip rows in this category
    pub exclude_category: Option<String>,
}

/// Outcome of a chunked bulk write
#[derive(Debug, Clone, Copy, Default)]
pub struct UpsertOutcome {
    /// Rows durably written
    pub saved: usize,

    /// Chunks that exhausted their retries
    pub failed_chunks: usize,
}

/// Client for the remote event table behind a PostgREST interface
#[derive(Clone)]
pub struct SupabaseClient {
    /// HTTP client, internally pooled and safe to share across workers
    client: Client,
    /// Base REST URL, `{endpoint}/rest/v1`
    base_url: String,
    /// Service API key
    api_key: String,
    /// Target table name
    table: String,
    /// Page size for fetches
    page_size: usize,
    /// Chunk size for `title in (...)` lookups
    cache_query_size: usize,
    /// Chunk size for bulk writes
    upsert_chunk_size: usize,
    /// Maximum number of retry attempts per write chunk
    max_retries: u32,
    /// Backoff step in milliseconds, grows linearly per attempt
    backoff_base_ms: u64,
}

impl SupabaseClient {
    /// Create a client from the store configuration
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let endpoint = config.resolve_endpoint();
        let url = Url::parse(&endpoint)
            .map_err(|e| StoreError::RequestFailed(format!("Invalid store endpoint '{}': {}", endpoint, e)))?;

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            base_url: format!("{}/rest/v1", url.as_str().trim_end_matches('/')),
            api_key: config.resolve_api_key(),
            table: config.table.clone(),
            page_size: config.page_size,
            cache_query_size: config.cache_query_size,
            upsert_chunk_size: config.upsert_chunk_size,
            max_retries: config.retry_count,
            backoff_base_ms: config.retry_backoff_ms,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.base_url, self.table)
    }

    /// Fetch every event in the filter range, one page at a time
    pub async fn fetch_events(&self, filter: &EventFilter) -> Result<Vec<EventRecord>, StoreError> {
        let mut all_events = Vec::new();
        let mut offset = 0usize;

        loop {
            let mut query: Vec<(String, String)> = vec![
                ("select".to_string(), "id,title,category,end_date".to_string()),
                ("end_date".to_string(), format!("gte.{}", filter.start_date)),
                ("end_date".to_string(), format!("lt.{}", filter.end_date)),
                ("order".to_string(), "end_date.asc".to_string()),
                ("limit".to_string(), self.page_size.to_string()),
                ("offset".to_string(), offset.to_string()),
            ];

            if filter.untranslated_only {
                query.push(("title_ko".to_string(), "is.null".to_string()));
            }

            if let Some(category) = &filter.exclude_category {
                query.push(("category".to_string(), format!("neq.{}", category)));
            }

            let response = self
                .client
                .get(self.table_url())
                .header("apikey", &self.api_key)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .query(&query)
                .send()
                .await
                .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

            let response = Self::check_status(response).await?;

            let page: Vec<EventRecord> = response
                .json()
                .await
                .map_err(|e| StoreError::DecodeError(e.to_string()))?;

            let page_len = page.len();
            all_events.extend(page);

            if page_len < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        debug!("Fetched {} events from {}", all_events.len(), self.table);
        Ok(all_events)
    }

    /// Look up previously stored translations for the given titles
    ///
    /// Queries run in bounded chunks; a failing chunk is logged and skipped
    /// so a transient store error only costs cache hits, never the run.
    /// The first stored translation per title wins.
    pub async fn cached_translations(&self, titles: &[String]) -> HashMap<String, String> {
        let mut cache = HashMap::new();

        for (chunk_index, chunk) in titles.chunks(self.cache_query_size.max(1)).enumerate() {
            let in_list = Self::quoted_in_list(chunk);
            let query: Vec<(String, String)> = vec![
                ("select".to_string(), "title,title_ko".to_string()),
                ("title".to_string(), format!("in.({})", in_list)),
                ("title_ko".to_string(), "not.is.null".to_string()),
            ];

            let result = self
                .client
                .get(self.table_url())
                .header("apikey", &self.api_key)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .query(&query)
                .send()
                .await;

            let rows: Result<Vec<CachedTranslation>, StoreError> = match result {
                Ok(response) => match Self::check_status(response).await {
                    Ok(response) => response
                        .json()
                        .await
                        .map_err(|e| StoreError::DecodeError(e.to_string())),
                    Err(e) => Err(e),
                },
                Err(e) => Err(StoreError::RequestFailed(e.to_string())),
            };

            match rows {
                Ok(rows) => {
                    for row in rows {
                        if let Some(title_ko) = row.title_ko {
                            cache.entry(row.title).or_insert(title_ko);
                        }
                    }
                }
                Err(e) => {
                    warn!("Cache lookup failed (chunk {}): {}", chunk_index + 1, e);
                }
            }
        }

        cache
    }

    /// Bulk-write translations in chunks with an id conflict target
    ///
    /// Each chunk is retried with linearly growing backoff; a chunk that
    /// exhausts its retries is counted and the next chunk is still attempted.
    pub async fn upsert_translations(&self, updates: &[TranslationUpdate]) -> UpsertOutcome {
        let mut outcome = UpsertOutcome::default();

        if updates.is_empty() {
            return outcome;
        }

        let chunk_size = self.upsert_chunk_size.max(1);
        let total_chunks = updates.len().div_ceil(chunk_size);

        for (chunk_index, chunk) in updates.chunks(chunk_size).enumerate() {
            let chunk_num = chunk_index + 1;
            let mut attempt = 0;
            let mut saved = None;

            while attempt <= self.max_retries {
                match self.upsert_chunk(chunk).await {
                    Ok(count) => {
                        saved = Some(count);
                        break;
                    }
                    Err(e) => {
                        attempt += 1;
                        if attempt <= self.max_retries {
                            let backoff_ms = self.backoff_base_ms * attempt as u64;
                            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                        } else {
                            error!("Store write failed (chunk {}/{}): {}", chunk_num, total_chunks, e);
                        }
                    }
                }
            }

            match saved {
                Some(count) => {
                    outcome.saved += count;
                    debug!("Saved chunk {}/{} ({} rows)", chunk_num, total_chunks, count);
                }
                None => outcome.failed_chunks += 1,
            }
        }

        outcome
    }

    /// Update a single record's translation, with retry
    ///
    /// Alternative write strategy to the bulk upsert, for spot fixes -
    /// API surface for library consumers
    #[allow(dead_code)]
    pub async fn update_title(&self, id: &str, title_ko: &str) -> Result<(), StoreError> {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            let result = self
                .client
                .patch(self.table_url())
                .header("apikey", &self.api_key)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .query(&[("id", format!("eq.{}", id))])
                .json(&serde_json::json!({ "title_ko": title_ko }))
                .send()
                .await;

            match result {
                Ok(response) => match Self::check_status(response).await {
                    Ok(_) => return Ok(()),
                    Err(e) => last_error = Some(e),
                },
                Err(e) => last_error = Some(StoreError::RequestFailed(e.to_string())),
            }

            attempt += 1;
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * attempt as u64;
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            StoreError::RequestFailed("Update failed with no recorded error".to_string())
        }))
    }

    async fn upsert_chunk(&self, chunk: &[TranslationUpdate]) -> Result<usize, StoreError> {
        let response = self
            .client
            .post(self.table_url())
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .query(&[("on_conflict", "id")])
            .json(chunk)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| StoreError::DecodeError(e.to_string()))?;

        Ok(rows.len())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        Err(StoreError::ApiError {
            status_code: status.as_u16(),
            message,
        })
    }

    /// Build a PostgREST `in.(...)` value list, quoting each title
    fn quoted_in_list(titles: &[String]) -> String {
        titles
            .iter()
            .map(|title| format!("\"{}\"", title.replace('\\', "\\\\").replace('"', "\\\"")))
            .collect::<Vec<_>>()
            .join(",")
    }
}
