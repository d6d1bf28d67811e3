/*!
 * # polyko - prediction-market title translation
 *
 * A Rust library for translating prediction-market event titles from
 * English to Korean with an LLM API and persisting the results to a
 * remote table.
 *
 * ## Features
 *
 * - Cache-aware batch planning: duplicate titles collapse into one
 *   translation unit, stored translations are reused
 * - Concurrent batch dispatch with a bounded worker count
 * - Retry with exponential backoff around the LLM API
 * - Deterministic post-processing of every translation (glossary,
 *   timezone consistency, verb sense, cultural context, month names)
 * - Chunked, retried bulk persistence through a PostgREST interface
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: Batch translation pipeline:
 *   - `translation::planner`: Dedup, cache split, batch partitioning
 *   - `translation::client`: Enumerated requests and response parsing
 *   - `translation::dispatch`: Bounded concurrent fan-out
 *   - `translation::corrector`: Post-processing correction passes
 *   - `translation::prompts`: Id-keyed prompt library
 *   - `translation::stats`: Shared run counters
 * - `store`: Remote event table access:
 *   - `store::supabase`: PostgREST client
 *   - `store::models`: Row types
 * - `providers`: LLM client implementations:
 *   - `providers::openai`: OpenAI chat-completions client
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod providers;
pub mod store;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunOptions};
pub use errors::{AppError, ProviderError, StoreError, TranslationError};
pub use store::{EventRecord, SupabaseClient};
pub use translation::{BatchDispatcher, RunStats, TranslationClient};
