use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::app_config::Config;
use crate::providers::openai::OpenAI;
use crate::store::{EventFilter, SupabaseClient, TranslationUpdate};
use crate::translation::{
    BatchDispatcher, PromptLibrary, RunStats, TranslationClient, planner,
};

// @module: Application controller for the translation run

/// Options for one translation run, resolved from the CLI
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Inclusive lower bound on `end_date`
    pub start_date: String,

    /// Exclusive upper bound on `end_date`
    pub end_date: String,

    /// Re-translate rows that already have a stored translation
    pub overwrite: bool,

    /// Skip rows in this category
    pub exclude_category: Option<String>,

    /// Cap the planned batch list to this prefix (dry/test runs)
    pub max_batches: Option<usize>,
}

/// Main application controller for the translation pipeline
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Run the full pipeline: fetch, plan, dispatch, persist, summarize
    pub async fn run(&self, options: RunOptions) -> Result<()> {
        let translation = &self.config.translation;

        info!(
            "Translation run: {} ~ {} | {} workers | {}",
            &options.start_date[..10.min(options.start_date.len())],
            &options.end_date[..10.min(options.end_date.len())],
            translation.workers,
            if options.overwrite { "overwrite" } else { "untranslated only" },
        );
        if let Some(category) = &options.exclude_category {
            info!("Excluding category: {}", category);
        }

        let store = SupabaseClient::from_config(&self.config.store)
            .context("Failed to create store client")?;

        // 1. Fetch every record in the target range
        info!("Fetching target events...");
        let filter = EventFilter {
            start_date: options.start_date.clone(),
            end_date: options.end_date.clone(),
            untranslated_only: !options.overwrite,
            exclude_category: options.exclude_category.clone(),
        };
        let events = store.fetch_events(&filter).await?;

        if events.is_empty() {
            info!("No events to translate.");
            return Ok(());
        }

        // 2. Preload stored translations, unless we are overwriting
        let unique_titles = planner::unique_titles(&events);
        let cache = if options.overwrite {
            HashMap::new()
        } else {
            info!("Cache lookup for {} unique titles...", unique_titles.len());
            store.cached_translations(&unique_titles).await
        };

        // 3. Plan batches over the uncached remainder
        let plan = planner::plan(&events, cache, translation.batch_size, options.max_batches);
        let dedup_savings = plan.dedup_savings(events.len());

        info!("Target events : {}", events.len());
        info!(
            "Unique titles : {} ({} duplicates removed)",
            plan.unique_titles.len(),
            dedup_savings
        );
        if !options.overwrite {
            info!("Cache hits    : {}", plan.cached.len());
        }
        info!("To translate  : {}", plan.titles_to_translate());
        info!("Batches       : {}", plan.batches.len());
        if plan.truncated_batches > 0 {
            warn!("Batch cap active, {} batches skipped this run", plan.truncated_batches);
        }
        if !plan.batches.is_empty() {
            info!(
                "Estimated time: ~{:.1} minutes",
                plan.batches.len() as f64 * 1.5 / translation.workers as f64 / 60.0
            );
        }

        let stats = Arc::new(Mutex::new(RunStats::new()));
        {
            let mut stats = stats.lock();
            stats.cache_hits = plan.cached.len();
            stats.dedup_savings = dedup_savings;
        }

        // 4. Concurrent translation, merged over the cache results
        let mut title_map = plan.cached.clone();

        if !plan.batches.is_empty() {
            info!("Translating with {} ({})...", translation.model, translation.endpoint);

            let provider = Arc::new(OpenAI::new_with_config(
                translation.resolve_api_key(),
                translation.endpoint.clone(),
                translation.retry_count,
                translation.retry_backoff_ms,
                translation.rate_limit,
            ));
            let prompts = PromptLibrary::load(&translation.prompt_file);
            let client = Arc::new(TranslationClient::new(
                provider,
                translation,
                prompts.system_prompt(),
            ));
            let dispatcher = BatchDispatcher::new(client, translation.workers);

            let progress_bar = ProgressBar::new(plan.batches.len() as u64);
            let template_result = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({percent}%) {msg} {eta}")
                .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            progress_bar.set_style(template_result);
            progress_bar.set_message("Translating");

            let pb = progress_bar.clone();
            let translated = dispatcher
                .dispatch(&plan.batches, stats.clone(), move |resolved, _total| {
                    pb.set_position(resolved as u64);
                })
                .await;

            progress_bar.finish_and_clear();
            title_map.extend(translated);
        }

        // 5. Persist resolved translations back to the store
        let updates: Vec<TranslationUpdate> = events
            .iter()
            .filter_map(|event| {
                title_map.get(&event.title).map(|title_ko| TranslationUpdate {
                    id: event.id.clone(),
                    title_ko: title_ko.clone(),
                })
            })
            .collect();

        info!("Saving {} rows...", updates.len());
        let outcome = store.upsert_translations(&updates).await;

        let summary = {
            let mut stats = stats.lock();
            stats.events_updated = outcome.saved;
            stats.failed_chunks = outcome.failed_chunks;
            stats.summary(title_map.len())
        };
        info!("{}", summary);

        Ok(())
    }
}
