/*!
 * Batch planning for a translation run.
 *
 * Collapses duplicate titles into single translation units, splits
 * cache hits from titles that need a live call, and partitions the
 * remainder into fixed-size batches. Planning is pure and
 * deterministic for a given record ordering, so batch contents are
 * reproducible run to run.
 */

use std::collections::{HashMap, HashSet};

use crate::store::EventRecord;

/// The planned work for one run
#[derive(Debug, Clone)]
pub struct TranslationPlan {
    /// Unique titles in first-seen order
    pub unique_titles: Vec<String>,

    /// Fan-out from each unique title to every record id sharing it
    pub title_to_ids: HashMap<String, Vec<String>>,

    /// Translations resolved from the cache, keyed by title
    pub cached: HashMap<String, String>,

    /// Batches of titles still needing a live translation call
    pub batches: Vec<Vec<String>>,

    /// Batches dropped by the `max_batches` cap, if any
    pub truncated_batches: usize,
}

impl TranslationPlan {
    /// Number of records collapsed away by deduplication
    pub fn dedup_savings(&self, total_records: usize) -> usize {
        total_records.saturating_sub(self.unique_titles.len())
    }

    /// Number of titles that still need a live call
    pub fn titles_to_translate(&self) -> usize {
        self.batches.iter().map(|batch| batch.len()).sum()
    }
}

/// Collect unique titles in first-seen order from fetched records.
pub fn unique_titles(records: &[EventRecord]) -> Vec<String> {
    let mut titles = Vec::new();
    let mut seen = HashSet::new();
    for record in records {
        if seen.insert(record.title.as_str()) {
            titles.push(record.title.clone());
        }
    }
    titles
}

/// Plan a run from fetched records and a preloaded cache.
///
/// `cache` holds previously stored translations keyed by title; overwrite
/// mode passes an empty map so every title is translated live. The
/// optional `max_batches` cap keeps a prefix of the planned batch list
/// (the original fetch order), for test and dry runs.
pub fn plan(
    records: &[EventRecord],
    cache: HashMap<String, String>,
    batch_size: usize,
    max_batches: Option<usize>,
) -> TranslationPlan {
    let batch_size = batch_size.max(1);

    // Dedup by exact title, keeping first-seen order from the fetch
    let mut unique_titles = Vec::new();
    let mut seen = HashSet::new();
    let mut title_to_ids: HashMap<String, Vec<String>> = HashMap::new();

    for record in records {
        if seen.insert(record.title.clone()) {
            unique_titles.push(record.title.clone());
        }
        title_to_ids
            .entry(record.title.clone())
            .or_default()
            .push(record.id.clone());
    }

    // Cache hits never enter a live batch
    let to_translate: Vec<String> = unique_titles
        .iter()
        .filter(|title| !cache.contains_key(*title))
        .cloned()
        .collect();

    let mut batches: Vec<Vec<String>> = to_translate
        .chunks(batch_size)
        .map(|chunk| chunk.to_vec())
        .collect();

    let mut truncated_batches = 0;
    if let Some(cap) = max_batches {
        if batches.len() > cap {
            truncated_batches = batches.len() - cap;
            batches.truncate(cap);
        }
    }

    TranslationPlan {
        unique_titles,
        title_to_ids,
        cached: cache,
        batches,
        truncated_batches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            title: title.to_string(),
            category: None,
            end_date: None,
        }
    }

    #[test]
    fn test_plan_withDuplicateTitles_shouldCollapseToUniqueSet() {
        let records = vec![
            record("1", "Will A happen?"),
            record("2", "Will B happen?"),
            record("3", "Will A happen?"),
        ];

        let plan = plan(&records, HashMap::new(), 10, None);

        assert_eq!(plan.unique_titles.len(), 2);
        assert_eq!(plan.title_to_ids["Will A happen?"], vec!["1", "3"]);
        assert_eq!(plan.dedup_savings(records.len()), 1);
    }

    #[test]
    fn test_plan_withCacheHit_shouldExcludeTitleFromEveryBatch() {
        let records = vec![record("1", "Cached title"), record("2", "Fresh title")];
        let mut cache = HashMap::new();
        cache.insert("Cached title".to_string(), "캐시된 제목".to_string());

        let plan = plan(&records, cache, 10, None);

        for batch in &plan.batches {
            assert!(!batch.contains(&"Cached title".to_string()));
        }
        assert_eq!(plan.titles_to_translate(), 1);
        assert_eq!(plan.cached["Cached title"], "캐시된 제목");
    }

    #[test]
    fn test_plan_batchUnion_shouldEqualUncachedUniqueTitles() {
        let records: Vec<EventRecord> = (0..7)
            .map(|i| record(&i.to_string(), &format!("Title {}", i)))
            .collect();
        let mut cache = HashMap::new();
        cache.insert("Title 2".to_string(), "제목 2".to_string());
        cache.insert("Title 5".to_string(), "제목 5".to_string());

        let plan = plan(&records, cache, 2, None);

        let mut batched: Vec<String> = plan.batches.iter().flatten().cloned().collect();
        let mut expected: Vec<String> = plan
            .unique_titles
            .iter()
            .filter(|t| !plan.cached.contains_key(*t))
            .cloned()
            .collect();
        batched.sort();
        expected.sort();
        assert_eq!(batched, expected);
    }

    #[test]
    fn test_plan_withFixedInput_shouldProduceDeterministicBatches() {
        let records = vec![
            record("1", "C"),
            record("2", "A"),
            record("3", "B"),
            record("4", "A"),
        ];

        let plan = plan(&records, HashMap::new(), 2, None);

        // First-seen order from the fetch, not sorted
        assert_eq!(plan.batches, vec![vec!["C", "A"], vec!["B"]]);
    }

    #[test]
    fn test_plan_withNoTitleInTwoBatches_shouldHoldForAnyInput() {
        let records: Vec<EventRecord> = (0..25)
            .map(|i| record(&i.to_string(), &format!("Title {}", i % 9)))
            .collect();

        let plan = plan(&records, HashMap::new(), 4, None);

        let mut seen = HashSet::new();
        for batch in &plan.batches {
            for title in batch {
                assert!(seen.insert(title.clone()), "title {} in two batches", title);
            }
        }
    }

    #[test]
    fn test_plan_withMaxBatches_shouldKeepPrefixAndCountTruncation() {
        let records: Vec<EventRecord> = (0..10)
            .map(|i| record(&i.to_string(), &format!("Title {}", i)))
            .collect();

        let plan = plan(&records, HashMap::new(), 3, Some(2));

        assert_eq!(plan.batches.len(), 2);
        assert_eq!(plan.truncated_batches, 2);
        assert_eq!(plan.batches[0], vec!["Title 0", "Title 1", "Title 2"]);
    }

    #[test]
    fn test_plan_withShortLastBatch_shouldNotPadIt() {
        let records: Vec<EventRecord> = (0..5)
            .map(|i| record(&i.to_string(), &format!("Title {}", i)))
            .collect();

        let plan = plan(&records, HashMap::new(), 3, None);

        assert_eq!(plan.batches.len(), 2);
        assert_eq!(plan.batches[1].len(), 2);
    }
}
