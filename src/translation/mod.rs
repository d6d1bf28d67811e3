/*!
 * Title translation pipeline.
 *
 * This module contains the core functionality for translating
 * prediction-market titles in batches. It is split into several
 * submodules:
 *
 * - `planner`: Dedup, cache split and batch partitioning
 * - `client`: Enumerated batch requests and response parsing
 * - `dispatch`: Bounded concurrent fan-out over planned batches
 * - `corrector`: Deterministic post-processing passes
 * - `prompts`: Id-keyed prompt library with built-in defaults
 * - `stats`: Shared run counters and the end-of-run summary
 */

// Re-export main types for easier usage
pub use self::client::TranslationClient;
pub use self::dispatch::BatchDispatcher;
pub use self::planner::TranslationPlan;
pub use self::prompts::PromptLibrary;
pub use self::stats::RunStats;

// Submodules
pub mod client;
pub mod corrector;
pub mod dispatch;
pub mod planner;
pub mod prompts;
pub mod stats;
