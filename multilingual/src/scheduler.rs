//! Initialization scheduling for keys the store has never seen

use crate::error::StoreResult;
use crate::key::TranslationKey;
use crate::record::{ClientType, SourceMap};
use crate::store::TranslationStore;
use std::collections::HashSet;
use tracing::debug;

/// Deduplicate gap keys and group their source values by word key
///
/// Within a group, source values keep the order in which they were first seen.
pub fn group_by_word<I>(gaps: I) -> SourceMap
where
    I: IntoIterator<Item = TranslationKey>,
{
    let mut seen = HashSet::new();
    let mut source_map = SourceMap::new();
    for key in gaps {
        if !seen.insert(key.clone()) {
            continue;
        }
        let (word, source_value) = key.into_parts();
        source_map
            .entry(word.to_string())
            .or_default()
            .push(source_value);
    }
    source_map
}

/// Ask the store to create rows for every gap in a single request
///
/// Returns the number of source values requested; nothing is sent when there
/// are no gaps.
pub async fn schedule_initialization<S>(
    store: &S,
    client_type: ClientType,
    gaps: Vec<TranslationKey>,
) -> StoreResult<usize>
where
    S: TranslationStore + ?Sized,
{
    let source_map = group_by_word(gaps);
    if source_map.is_empty() {
        return Ok(0);
    }

    let pending: usize = source_map.values().map(Vec::len).sum();
    debug!(
        store = store.store_name(),
        client_type = %client_type,
        groups = source_map.len(),
        pending,
        "Initializing missing translation rows"
    );
    store.add_translations(client_type, &source_map).await?;
    Ok(pending)
}
