/*!
 * Provider implementations for LLM chat-completion services.
 *
 * This module contains the client used to reach the translation model:
 * - OpenAI: OpenAI chat-completions API integration
 *
 * The `ChatProvider` trait is the seam between the translation pipeline
 * and the wire client, so tests can substitute a scripted provider.
 */

use async_trait::async_trait;

use crate::errors::ProviderError;
use self::openai::{ChatRequest, ChatResponse};

/// Common trait for chat-completion providers
///
/// Implementations must be safe to share across concurrent batch workers.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Complete a chat request and return the provider response
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;
}

pub mod openai;
