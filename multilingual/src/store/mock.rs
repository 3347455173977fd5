//! Mock store for testing
//!
//! Answers from a fixed set of records (or fails on demand) and keeps a log of
//! every request so tests can assert on what the pipeline sent.
//!
//! # Example
//!
//! ```ignore
//! use multilingual::store::{MockMode, MockStore};
//!
//! let store = MockStore::new(MockMode::Empty);
//! let records = store.list_translations(ClientType::Web, &conditions).await?;
//! assert!(records.is_empty());
//! assert_eq!(store.lookups().len(), 1);
//! ```

use crate::error::{StoreError, StoreResult};
use crate::record::{ClientType, InitializeRequest, LookupRequest, SourceMap, TranslationRecord};
use crate::store::TranslationStore;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

/// How the mock answers
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Answer lookups from these records (filtered by client type and condition)
    Records(Vec<TranslationRecord>),

    /// Every lookup comes back empty
    Empty,

    /// Every lookup fails with this message
    FailLookup(String),

    /// Lookups come back empty, initialization fails with this message
    FailInitialize(String),
}

/// Scripted store that records every request it receives
#[derive(Debug)]
pub struct MockStore {
    mode: MockMode,
    lookups: Mutex<Vec<LookupRequest>>,
    initializations: Mutex<Vec<InitializeRequest>>,
}

impl MockStore {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            lookups: Mutex::new(Vec::new()),
            initializations: Mutex::new(Vec::new()),
        }
    }

    /// Shorthand for `MockStore::new(MockMode::Records(records))`
    pub fn with_records(records: Vec<TranslationRecord>) -> Self {
        Self::new(MockMode::Records(records))
    }

    /// Lookup requests received so far
    pub fn lookups(&self) -> Vec<LookupRequest> {
        recover(&self.lookups).clone()
    }

    /// Initialization requests received so far
    pub fn initializations(&self) -> Vec<InitializeRequest> {
        recover(&self.initializations).clone()
    }

    fn answer(&self, client_type: ClientType, conditions: &[String]) -> Vec<TranslationRecord> {
        let records: &[TranslationRecord] = match &self.mode {
            MockMode::Records(records) => records.as_slice(),
            _ => &[],
        };
        records
            .iter()
            .filter(|record| record.client_type == client_type)
            .filter(|record| conditions.contains(&record.composite_key()))
            .cloned()
            .collect()
    }
}

// The log is append-only, so a panic mid-push cannot leave it inconsistent.
fn recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl TranslationStore for MockStore {
    async fn list_translations(
        &self,
        client_type: ClientType,
        conditions: &[String],
    ) -> StoreResult<Vec<TranslationRecord>> {
        recover(&self.lookups).push(LookupRequest {
            client_type,
            conditions: conditions.to_vec(),
        });

        match &self.mode {
            MockMode::FailLookup(message) => Err(StoreError::Unavailable(message.clone())),
            _ => Ok(self.answer(client_type, conditions)),
        }
    }

    async fn add_translations(
        &self,
        client_type: ClientType,
        source_map: &SourceMap,
    ) -> StoreResult<()> {
        recover(&self.initializations).push(InitializeRequest {
            client_type,
            source_map: source_map.clone(),
        });

        match &self.mode {
            MockMode::FailInitialize(message) => Err(StoreError::Unavailable(message.clone())),
            _ => Ok(()),
        }
    }

    fn store_name(&self) -> &str {
        "Mock Store"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<TranslationRecord> {
        vec![
            TranslationRecord::new(ClientType::Web, "User.status", "ACTIVE").with_target("激活"),
            TranslationRecord::new(ClientType::App, "User.status", "ACTIVE").with_target("已激活"),
        ]
    }

    #[tokio::test]
    async fn test_records_mode_filters_by_condition_and_client() {
        let store = MockStore::with_records(records());
        let answer = store
            .list_translations(
                ClientType::App,
                &["User.status#ACTIVE".to_string(), "User.status#LOCKED".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(answer.len(), 1);
        assert_eq!(answer[0].target(), Some("已激活"));
    }

    #[tokio::test]
    async fn test_empty_mode() {
        let store = MockStore::new(MockMode::Empty);
        let answer = store
            .list_translations(ClientType::Web, &["User.status#ACTIVE".to_string()])
            .await
            .unwrap();
        assert!(answer.is_empty());
    }

    #[tokio::test]
    async fn test_fail_lookup_mode() {
        let store = MockStore::new(MockMode::FailLookup("connection refused".to_string()));
        let result = store
            .list_translations(ClientType::Web, &["User.status#ACTIVE".to_string()])
            .await;
        match result {
            Err(StoreError::Unavailable(message)) => assert_eq!(message, "connection refused"),
            other => panic!("Expected Unavailable, got {:?}", other),
        }
        // failed calls are still logged
        assert_eq!(store.lookups().len(), 1);
    }

    #[tokio::test]
    async fn test_fail_initialize_mode() {
        let store = MockStore::new(MockMode::FailInitialize("read only".to_string()));
        let result = store
            .add_translations(ClientType::Web, &SourceMap::new())
            .await;
        assert!(result.is_err());
        assert_eq!(store.initializations().len(), 1);
    }

    #[tokio::test]
    async fn test_requests_are_logged_in_order() {
        let store = MockStore::new(MockMode::Empty);
        store
            .list_translations(ClientType::Web, &["a.b#1".to_string()])
            .await
            .unwrap();
        store
            .list_translations(ClientType::Admin, &["a.b#2".to_string()])
            .await
            .unwrap();

        let lookups = store.lookups();
        assert_eq!(lookups.len(), 2);
        assert_eq!(lookups[0].conditions, vec!["a.b#1"]);
        assert_eq!(lookups[1].client_type, ClientType::Admin);
    }

    #[test]
    fn test_store_name() {
        assert_eq!(MockStore::new(MockMode::Empty).store_name(), "Mock Store");
    }
}
