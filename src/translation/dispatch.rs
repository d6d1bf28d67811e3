/*!
 * Concurrent batch dispatch.
 *
 * Runs planned batches across a bounded number of in-flight workers,
 * merges their results into the title-keyed translation map, and
 * records exactly one stats mutation per batch outcome. Completion
 * order is unconstrained: the planner guarantees batch title sets are
 * disjoint, so merging is commutative.
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use futures::stream::{self, StreamExt};
use log::{debug, error, info};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use super::client::TranslationClient;
use super::stats::RunStats;

/// Dispatcher fanning batches out to the translation client
pub struct BatchDispatcher {
    /// The translation client to use
    client: Arc<TranslationClient>,

    /// Maximum number of batches in flight
    workers: usize,
}

impl BatchDispatcher {
    /// Create a dispatcher with the given concurrency bound
    pub fn new(client: Arc<TranslationClient>, workers: usize) -> Self {
        Self {
            client,
            workers: workers.max(1),
        }
    }

    /// Translate every batch and merge the results by title.
    ///
    /// Retries happen inside the provider client; a batch is never
    /// re-submitted here. The progress callback fires once per resolved
    /// batch with (resolved, total).
    pub async fn dispatch(
        &self,
        batches: &[Vec<String>],
        stats: Arc<Mutex<RunStats>>,
        progress_callback: impl Fn(usize, usize) + Clone + Send + Sync + 'static,
    ) -> HashMap<String, String> {
        if batches.is_empty() {
            return HashMap::new();
        }

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let total_batches = batches.len();
        let resolved_batches = Arc::new(AtomicUsize::new(0));

        let results = stream::iter(batches.iter().enumerate())
            .map(|(batch_index, batch)| {
                let client = self.client.clone();
                let semaphore = semaphore.clone();
                let stats = stats.clone();
                let resolved_batches = resolved_batches.clone();
                let progress_callback = progress_callback.clone();

                async move {
                    let _permit = semaphore.acquire().await.unwrap();

                    debug!("Translating batch {} of {}", batch_index + 1, total_batches);
                    let start_time = Instant::now();

                    let result = client.translate_batch(batch).await;

                    // Exactly one counter mutation per batch outcome
                    let batch_result = {
                        let mut stats = stats.lock();
                        match result {
                            Ok(map) => {
                                stats.record_batch_success(map.len());
                                map
                            }
                            Err(e) => {
                                stats.record_batch_failure();
                                error!("Batch {} failed: {}", batch_index + 1, e);
                                HashMap::new()
                            }
                        }
                    };

                    let current = resolved_batches.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total_batches);

                    debug!(
                        "Batch {} resolved in {:?} ({} titles)",
                        batch_index + 1,
                        start_time.elapsed(),
                        batch_result.len()
                    );

                    batch_result
                }
            })
            .buffer_unordered(self.workers)
            .collect::<Vec<_>>()
            .await;

        let mut merged = HashMap::new();
        for batch_result in results {
            merged.extend(batch_result);
        }

        info!(
            "Dispatched {} batches, {} titles resolved",
            total_batches,
            merged.len()
        );

        merged
    }
}
