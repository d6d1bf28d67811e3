/*!
 * Remote event store access.
 *
 * This module contains the gateway to the managed Postgres table that
 * holds prediction-market events, split into:
 *
 * - `models`: Row types exchanged with the store
 * - `supabase`: PostgREST client with pagination, chunked lookups and
 *   chunked, retried bulk writes
 */

pub use self::models::{EventRecord, TranslationUpdate};
pub use self::supabase::{EventFilter, SupabaseClient};

pub mod models;
pub mod supabase;
