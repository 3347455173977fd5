//! Gap detection: requested keys the store has no row for

use crate::key::TranslationKey;
use crate::record::RecordIndex;

/// Keep the conditions that no fetched record answers
///
/// A record with an empty target still counts as an answer: the row exists and
/// is waiting for a translator, so it must not be initialized again. The check
/// runs on the keys collected before write-back, never on live field values.
pub fn detect_gaps(conditions: Vec<TranslationKey>, index: &RecordIndex<'_>) -> Vec<TranslationKey> {
    conditions
        .into_iter()
        .filter(|key| !index.is_resolved(&key.encode()))
        .collect()
}
