/*!
 * Tests for concurrent batch dispatch and shared run statistics
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use polyko::app_config::TranslationConfig;
use polyko::errors::ProviderError;
use polyko::translation::prompts::PromptLibrary;
use polyko::translation::{BatchDispatcher, RunStats, TranslationClient};

use crate::common::mock_providers::MockChatProvider;

fn dispatcher_over(provider: Arc<MockChatProvider>, workers: usize) -> BatchDispatcher {
    let config = TranslationConfig::default();
    let client = Arc::new(TranslationClient::new(
        provider,
        &config,
        PromptLibrary::empty().system_prompt(),
    ));
    BatchDispatcher::new(client, workers)
}

fn batch(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_dispatch_withDisjointBatches_shouldMergeAllResults() {
    let provider = Arc::new(MockChatProvider::new());
    let dispatcher = dispatcher_over(provider, 3);
    let stats = Arc::new(Mutex::new(RunStats::new()));

    let batches = vec![
        batch(&["A?", "B?"]),
        batch(&["C?"]),
        batch(&["D?", "E?", "F?"]),
    ];

    let merged = dispatcher.dispatch(&batches, stats.clone(), |_, _| {}).await;

    assert_eq!(merged.len(), 6);
    assert_eq!(merged["C?"], "C? [ko]");

    let stats = stats.lock();
    assert_eq!(stats.api_calls, 3);
    assert_eq!(stats.failed_batches, 0);
    assert_eq!(stats.batches_resolved(), batches.len());
    assert_eq!(stats.titles_translated, 6);
}

#[tokio::test]
async fn test_dispatch_withFailingBatch_shouldCountFailureAndContinue() {
    let provider = Arc::new(MockChatProvider::new());
    // Single worker keeps the scripted order deterministic
    provider.push_failure(ProviderError::ApiError {
        status_code: 500,
        message: "server exploded".into(),
    });
    provider.push_response("1. 두 번째 배치");
    let dispatcher = dispatcher_over(provider, 1);
    let stats = Arc::new(Mutex::new(RunStats::new()));

    let batches = vec![batch(&["Doomed?"]), batch(&["Second batch?"])];
    let merged = dispatcher.dispatch(&batches, stats.clone(), |_, _| {}).await;

    // The failed batch contributes nothing; the next one still runs
    assert_eq!(merged.len(), 1);
    assert_eq!(merged["Second batch?"], "두 번째 배치");

    let stats = stats.lock();
    assert_eq!(stats.api_calls, 1);
    assert_eq!(stats.failed_batches, 1);
    assert_eq!(stats.batches_resolved(), batches.len());
}

#[tokio::test]
async fn test_dispatch_progressCallback_shouldFireOncePerBatch() {
    let provider = Arc::new(MockChatProvider::new());
    let dispatcher = dispatcher_over(provider, 2);
    let stats = Arc::new(Mutex::new(RunStats::new()));

    let fired = Arc::new(AtomicUsize::new(0));
    let fired_clone = fired.clone();

    let batches = vec![batch(&["A?"]), batch(&["B?"]), batch(&["C?"]), batch(&["D?"])];
    dispatcher
        .dispatch(&batches, stats, move |resolved, total| {
            fired_clone.fetch_add(1, Ordering::SeqCst);
            assert!(resolved >= 1 && resolved <= total);
        })
        .await;

    assert_eq!(fired.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_dispatch_withEmptyPlan_shouldReturnEmptyMap() {
    let provider = Arc::new(MockChatProvider::new());
    let dispatcher = dispatcher_over(provider.clone(), 2);
    let stats = Arc::new(Mutex::new(RunStats::new()));

    let merged = dispatcher.dispatch(&[], stats.clone(), |_, _| {}).await;

    assert!(merged.is_empty());
    assert_eq!(stats.lock().batches_resolved(), 0);
    assert_eq!(provider.tracker().lock().unwrap().call_count, 0);
}

#[tokio::test]
async fn test_dispatch_withManyBatchesFewWorkers_shouldResolveEveryBatch() {
    let provider = Arc::new(MockChatProvider::new());
    let dispatcher = dispatcher_over(provider, 2);
    let stats = Arc::new(Mutex::new(RunStats::new()));

    let batches: Vec<Vec<String>> = (0..10).map(|i| vec![format!("Title {}?", i)]).collect();

    let merged = dispatcher.dispatch(&batches, stats.clone(), |_, _| {}).await;

    assert_eq!(merged.len(), 10);
    assert_eq!(stats.lock().batches_resolved(), 10);
}
