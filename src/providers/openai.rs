use std::time::Duration;
use serde::{Deserialize, Serialize};
use async_trait::async_trait;
use reqwest::Client;
use log::error;

use crate::errors::ProviderError;
use super::ChatProvider;

/// OpenAI client for the chat-completions API
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to the public API)
    endpoint: String,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Optional rate limit in requests per minute
    rate_limit: Option<u32>,
}

/// Chat-completions request
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Chat message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    /// Number of prompt tokens
    pub prompt_tokens: u32,
    /// Number of completion tokens
    pub completion_tokens: u32,
    /// Total number of tokens
    pub total_tokens: u32,
}

/// Chat-completions response
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// The completion choices
    pub choices: Vec<ChatChoice>,
    /// Token usage information, when the API reports it
    pub usage: Option<TokenUsage>,
}

/// Individual completion choice
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// The response message
    pub message: ChatMessage,
}

/// Builder methods for ChatRequest - API surface for library consumers
#[allow(dead_code)]
impl ChatRequest {
    /// Create a new chat request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of completion tokens
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// The messages accumulated so far
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

/// OpenAI client implementation - some methods are API surface for library consumers
#[allow(dead_code)]
impl OpenAI {
    /// Create a new OpenAI client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::new_with_config(api_key, endpoint, 3, 1000, None)
    }

    /// Create a new OpenAI client with retry and rate-limit configuration
    ///
    /// Uses connection pooling for better performance with concurrent requests.
    pub fn new_with_config(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        max_retries: u32,
        backoff_base_ms: u64,
        rate_limit: Option<u32>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                // Keep connections alive for better performance
                .pool_idle_timeout(Duration::from_secs(90))
                .pool_max_idle_per_host(20)
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            max_retries,
            backoff_base_ms,
            rate_limit,
        }
    }

    /// Extract the text of the first choice from a response
    pub fn extract_text(response: &ChatResponse) -> String {
        response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }

    fn api_url(&self) -> String {
        if self.endpoint.is_empty() {
            "https://api.openai.com/v1/chat/completions".to_string()
        } else {
            format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
        }
    }

    /// Send a chat request with retry logic
    ///
    /// Network failures, 5xx responses and 429 responses are retried with
    /// exponential backoff. Other client errors fail immediately.
    async fn complete_with_retries(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let url = self.api_url();

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            // Pace requests when a rate limit is configured
            if let Some(rate_limit) = self.rate_limit {
                if rate_limit > 0 && attempt > 0 {
                    let delay_ms = 60_000 / rate_limit as u64;
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }

            let response_result = self
                .client
                .post(&url)
                .header("Content-Type", "application/json")
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(request)
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<ChatResponse>().await.map_err(|e| {
                            ProviderError::ParseError(format!(
                                "Failed to parse chat-completions response: {}",
                                e
                            ))
                        });
                    } else if status.as_u16() == 429 || status.is_server_error() {
                        // Transient - can retry
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!(
                            "OpenAI API error ({}): {} - attempt {}/{}",
                            status,
                            error_text,
                            attempt + 1,
                            self.max_retries + 1
                        );
                        last_error = Some(if status.as_u16() == 429 {
                            ProviderError::RateLimitExceeded(error_text)
                        } else {
                            ProviderError::ApiError {
                                status_code: status.as_u16(),
                                message: error_text,
                            }
                        });
                    } else {
                        // Client error - don't retry
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("OpenAI API error ({}): {}", status, error_text);
                        return Err(if status.as_u16() == 401 {
                            ProviderError::AuthenticationError(error_text)
                        } else {
                            ProviderError::ApiError {
                                status_code: status.as_u16(),
                                message: error_text,
                            }
                        });
                    }
                }
                Err(e) => {
                    // Network error - can retry
                    error!(
                        "OpenAI API network error: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(ProviderError::RequestFailed(e.to_string()));
                }
            }

            attempt += 1;

            // If we have more retries left, wait with exponential backoff
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed("Request failed with no recorded error".to_string())
        }))
    }
}

#[async_trait]
impl ChatProvider for OpenAI {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        self.complete_with_retries(&request).await
    }
}
