/*!
 * Batch translation client.
 *
 * Builds one enumerated chat request per batch, parses the numbered
 * response lines back into per-title translations, and runs every
 * translation through the correction pipeline. Missing response lines
 * degrade silently to the untranslated source title; transport
 * failures surface as errors once the provider exhausts its retries.
 */

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use log::{debug, warn};

use crate::app_config::TranslationConfig;
use crate::errors::TranslationError;
use crate::providers::ChatProvider;
use crate::providers::openai::{ChatRequest, OpenAI};
use super::corrector;

/// Client translating batches of unique titles
pub struct TranslationClient {
    /// Provider implementation, shared across batch workers
    provider: Arc<dyn ChatProvider>,

    /// Model name for each request
    model: String,

    /// Generation temperature
    temperature: f32,

    /// Completion-token ceiling per request
    max_tokens: u32,

    /// System prompt sent with every batch
    system_prompt: String,
}

impl TranslationClient {
    /// Create a client over the given provider
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        config: &TranslationConfig,
        system_prompt: String,
    ) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            system_prompt,
        }
    }

    /// Translate one batch of titles into a title -> translation map.
    ///
    /// Every input title gets an entry: parsed translations are corrected,
    /// titles missing from the response fall back to their source text.
    /// An error means the provider exhausted its retries; the caller
    /// counts the batch as failed.
    pub async fn translate_batch(
        &self,
        titles: &[String],
    ) -> Result<HashMap<String, String>, TranslationError> {
        if titles.is_empty() {
            return Ok(HashMap::new());
        }

        let enumerated = titles
            .iter()
            .enumerate()
            .map(|(i, title)| format!("{}. {}", i + 1, title))
            .collect::<Vec<_>>()
            .join("\n");

        let request = ChatRequest::new(&self.model)
            .add_message("system", &self.system_prompt)
            .add_message("user", format!("번역할 제목들:\n{}", enumerated))
            .temperature(self.temperature)
            .max_tokens(self.max_tokens);

        let response = self.provider.complete(request).await?;
        let response_text = OpenAI::extract_text(&response);

        let parsed = parse_numbered_response(&response_text);

        if parsed.len() != titles.len() {
            warn!(
                "Translation count mismatch: parsed {} of {} titles",
                parsed.len(),
                titles.len()
            );
        }

        let mut result = HashMap::with_capacity(titles.len());
        for (i, title) in titles.iter().enumerate() {
            let translation = match parsed.get(&(i + 1)) {
                Some(text) => text.as_str(),
                None => {
                    debug!("No response line for title {}, keeping source text", i + 1);
                    title.as_str()
                }
            };
            result.insert(title.clone(), corrector::correct(title, translation));
        }

        Ok(result)
    }
}

/// Parse response lines of the form `"<integer>. <text>"`.
///
/// Returns a sparse index -> text map. Lines that do not match are
/// ignored; duplicate indices keep the last occurrence; out-of-range
/// indices are harmless because callers only look up 1..=N.
pub fn parse_numbered_response(text: &str) -> BTreeMap<usize, String> {
    let mut translations = BTreeMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((prefix, rest)) = line.split_once(". ") {
            if let Ok(index) = prefix.parse::<usize>() {
                translations.insert(index, rest.trim().to_string());
            }
        }
    }

    translations
}
