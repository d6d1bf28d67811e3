/*!
 * Shared run statistics.
 *
 * One RunStats instance is shared across concurrent batch workers
 * behind a single exclusive lock; every batch outcome mutates it
 * exactly once. The end-of-run summary is rendered from a snapshot.
 */

use std::time::{Duration, Instant};

/// Counters for one translation run
#[derive(Clone)]
pub struct RunStats {
    /// Titles translated by live API calls
    pub titles_translated: usize,

    /// Completed API calls (one per successful batch)
    pub api_calls: usize,

    /// Batches that exhausted their retries
    pub failed_batches: usize,

    /// Titles resolved from the stored-translation cache
    pub cache_hits: usize,

    /// Records collapsed away by title deduplication
    pub dedup_savings: usize,

    /// Rows durably written to the store
    pub events_updated: usize,

    /// Write chunks that exhausted their retries
    pub failed_chunks: usize,

    /// Start time of the run
    start_time: Instant,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStats {
    /// Create empty counters, starting the run clock
    pub fn new() -> Self {
        Self {
            titles_translated: 0,
            api_calls: 0,
            failed_batches: 0,
            cache_hits: 0,
            dedup_savings: 0,
            events_updated: 0,
            failed_chunks: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one successful batch and the titles it resolved
    pub fn record_batch_success(&mut self, translated: usize) {
        self.api_calls += 1;
        self.titles_translated += translated;
    }

    /// Record one batch that exhausted its retries
    pub fn record_batch_failure(&mut self) {
        self.failed_batches += 1;
    }

    /// Total batch outcomes recorded so far
    pub fn batches_resolved(&self) -> usize {
        self.api_calls + self.failed_batches
    }

    /// Time since the run started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Rows written per minute of elapsed time
    pub fn rows_per_minute(&self) -> f64 {
        let minutes = self.elapsed().as_secs_f64() / 60.0;
        if minutes > 0.0 {
            self.events_updated as f64 / minutes
        } else {
            0.0
        }
    }

    /// Render the end-of-run summary
    pub fn summary(&self, unique_translations: usize) -> String {
        let mut lines = vec![
            "Run complete".to_string(),
            format!("  Events updated     : {}", self.events_updated),
            format!("  Unique translations: {}", unique_translations),
        ];

        if self.cache_hits > 0 {
            lines.push(format!("  Cache reuse        : {}", self.cache_hits));
        }
        if self.dedup_savings > 0 {
            lines.push(format!(
                "  Dedup savings      : {} (API calls avoided)",
                self.dedup_savings
            ));
        }

        lines.push(format!("  Failed batches     : {}", self.failed_batches));
        if self.failed_chunks > 0 {
            lines.push(format!("  Failed write chunks: {}", self.failed_chunks));
        }

        lines.push(format!(
            "  Elapsed            : {:.1} minutes",
            self.elapsed().as_secs_f64() / 60.0
        ));
        if self.events_updated > 0 {
            lines.push(format!(
                "  Throughput         : {:.0} rows/minute",
                self.rows_per_minute()
            ));
        }

        lines.join("\n")
    }
}
