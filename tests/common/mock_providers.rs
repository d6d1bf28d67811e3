/*!
 * Mock provider implementations for testing
 *
 * This module provides a mock chat provider to avoid external API calls
 * in tests. It implements the ChatProvider trait and either replays
 * scripted responses or echoes the requested titles back as
 * pseudo-translations.
 */

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use polyko::errors::ProviderError;
use polyko::providers::ChatProvider;
use polyko::providers::openai::{ChatChoice, ChatMessage, ChatRequest, ChatResponse, TokenUsage};

/// Tracks API calls to ensure no actual external requests are made
#[derive(Debug, Default)]
pub struct ApiCallTracker {
    /// Count of mock API calls made
    pub call_count: usize,
    /// Last request received
    pub last_request: Option<String>,
}

/// Mock chat provider with scripted responses
///
/// Scripted responses (or failures) are consumed front to back; once the
/// script is exhausted the mock echoes every numbered line of the user
/// message back with a " [ko]" suffix, which keeps multi-batch tests
/// independent of completion order.
pub struct MockChatProvider {
    tracker: Arc<Mutex<ApiCallTracker>>,
    scripted: Mutex<VecDeque<Result<String, ProviderError>>>,
}

impl MockChatProvider {
    /// Create a new mock provider in echo mode
    pub fn new() -> Self {
        MockChatProvider {
            tracker: Arc::new(Mutex::new(ApiCallTracker::default())),
            scripted: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a scripted response body
    pub fn push_response(&self, text: &str) {
        self.scripted.lock().unwrap().push_back(Ok(text.to_string()));
    }

    /// Queue a scripted failure
    pub fn push_failure(&self, error: ProviderError) {
        self.scripted.lock().unwrap().push_back(Err(error));
    }

    /// Get the API call tracker
    pub fn tracker(&self) -> Arc<Mutex<ApiCallTracker>> {
        self.tracker.clone()
    }

    /// Echo the numbered lines of the user message as pseudo-translations
    fn echo_translation(request: &ChatRequest) -> String {
        let user_content = request
            .messages()
            .iter()
            .rev()
            .find(|message| message.role == "user")
            .map(|message| message.content.clone())
            .unwrap_or_default();

        user_content
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                let (prefix, rest) = line.split_once(". ")?;
                prefix.parse::<usize>().ok()?;
                Some(format!("{}. {} [ko]", prefix, rest))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for MockChatProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        {
            let mut tracker = self.tracker.lock().unwrap();
            tracker.call_count += 1;
            tracker.last_request = Some(format!("{:?}", request));
        }

        let scripted = self.scripted.lock().unwrap().pop_front();
        let content = match scripted {
            Some(Ok(text)) => text,
            Some(Err(error)) => return Err(error),
            None => Self::echo_translation(&request),
        };

        Ok(ChatResponse {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    role: "assistant".into(),
                    content,
                },
            }],
            usage: Some(TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 20,
                total_tokens: 30,
            }),
        })
    }
}
