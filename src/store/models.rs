/*!
 * Row types exchanged with the remote event store.
 */

use serde::{Deserialize, Serialize};

/// A prediction-market event row, immutable once fetched
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    /// Primary key of the event
    pub id: String,

    /// Source title (English)
    pub title: String,

    /// Category label, when the store has one
    #[serde(default)]
    pub category: Option<String>,

    /// Market end timestamp (timestamptz, as reported by the store)
    #[serde(default)]
    pub end_date: Option<String>,
}

/// A previously stored translation, keyed by the source title
#[derive(Debug, Clone, Deserialize)]
pub struct CachedTranslation {
    /// Source title (English)
    pub title: String,

    /// Stored Korean translation
    pub title_ko: Option<String>,
}

/// A pending `title_ko` write, keyed by record id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationUpdate {
    /// Primary key of the event
    pub id: String,

    /// Final corrected translation
    pub title_ko: String,
}
