//! In-process translation table

use crate::error::{StoreError, StoreResult};
use crate::key;
use crate::record::{ClientType, SourceMap, TranslationRecord};
use crate::store::TranslationStore;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type Table = BTreeMap<(ClientType, String), TranslationRecord>;

/// A translation table held in memory, keyed by client type and composite key
///
/// Every `(client type, word key, source value)` triple holds at most one row,
/// so lookups never return duplicates.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RwLock<Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-filled with records; later duplicates replace earlier ones
    pub fn from_records(records: impl IntoIterator<Item = TranslationRecord>) -> Self {
        let table = records
            .into_iter()
            .map(|record| ((record.client_type, record.composite_key()), record))
            .collect();
        Self {
            table: RwLock::new(table),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Table>> {
        self.table.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Table>> {
        self.table.write().map_err(|_| StoreError::Poisoned)
    }

    /// Insert or replace one row
    pub fn upsert(&self, record: TranslationRecord) -> StoreResult<()> {
        self.write()?
            .insert((record.client_type, record.composite_key()), record);
        Ok(())
    }

    /// Set the target value of an existing or new row
    pub fn set_target(
        &self,
        client_type: ClientType,
        word_key: &str,
        source_value: &str,
        target: &str,
    ) -> StoreResult<()> {
        self.upsert(TranslationRecord::new(client_type, word_key, source_value).with_target(target))
    }

    /// All rows for one client type, in key order
    pub fn records(&self, client_type: ClientType) -> StoreResult<Vec<TranslationRecord>> {
        Ok(self
            .read()?
            .iter()
            .filter(|((client, _), _)| *client == client_type)
            .map(|(_, record)| record.clone())
            .collect())
    }

    /// Rows still waiting for a translation
    pub fn untranslated(&self, client_type: ClientType) -> StoreResult<Vec<TranslationRecord>> {
        Ok(self
            .records(client_type)?
            .into_iter()
            .filter(|record| !record.is_translated())
            .collect())
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.is_empty())
    }
}

#[async_trait]
impl TranslationStore for MemoryStore {
    async fn list_translations(
        &self,
        client_type: ClientType,
        conditions: &[String],
    ) -> StoreResult<Vec<TranslationRecord>> {
        let table = self.read()?;
        let mut seen = HashSet::new();
        Ok(conditions
            .iter()
            .filter(|condition| seen.insert(condition.as_str()))
            .filter_map(|condition| table.get(&(client_type, condition.clone())))
            .cloned()
            .collect())
    }

    async fn add_translations(
        &self,
        client_type: ClientType,
        source_map: &SourceMap,
    ) -> StoreResult<()> {
        let mut table = self.write()?;
        for (word_key, sources) in source_map {
            for source in sources {
                table
                    .entry((client_type, key::composite(word_key, source)))
                    .or_insert_with(|| TranslationRecord::new(client_type, word_key, source));
            }
        }
        Ok(())
    }

    fn store_name(&self) -> &str {
        "Memory Store"
    }
}
