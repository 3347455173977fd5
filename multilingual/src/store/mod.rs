//! The storage collaborator
//!
//! [`TranslationStore`] is the seam between the pipeline and wherever
//! translations live. The pipeline issues at most two calls per run: one
//! batched lookup and one batched initialization.
//!
//! Implementations in this crate:
//!
//! - [`MemoryStore`] - process-local table, used by the web service and tests
//! - [`MockStore`] - scripted responses plus a log of every request received

pub mod memory;
pub mod mock;

pub use memory::MemoryStore;
pub use mock::{MockMode, MockStore};

use crate::error::StoreResult;
use crate::record::{ClientType, SourceMap, TranslationRecord};
use async_trait::async_trait;
use std::sync::Arc;

/// Query and initialize stored translations
///
/// Implementations must be safe to call from many pipeline runs at once.
#[async_trait]
pub trait TranslationStore: Send + Sync {
    /// Fetch the records matching any of the `scope.field#source` conditions
    ///
    /// Records for keys the store has never seen are simply absent from the
    /// result; an empty result is not an error.
    async fn list_translations(
        &self,
        client_type: ClientType,
        conditions: &[String],
    ) -> StoreResult<Vec<TranslationRecord>>;

    /// Make sure a row exists for every `(word key, source value)` pair
    ///
    /// Rows that already exist are left as they are.
    async fn add_translations(
        &self,
        client_type: ClientType,
        source_map: &SourceMap,
    ) -> StoreResult<()>;

    /// Name used in log output
    fn store_name(&self) -> &str;
}

#[async_trait]
impl<T: TranslationStore + ?Sized> TranslationStore for Arc<T> {
    async fn list_translations(
        &self,
        client_type: ClientType,
        conditions: &[String],
    ) -> StoreResult<Vec<TranslationRecord>> {
        (**self).list_translations(client_type, conditions).await
    }

    async fn add_translations(
        &self,
        client_type: ClientType,
        source_map: &SourceMap,
    ) -> StoreResult<()> {
        (**self).add_translations(client_type, source_map).await
    }

    fn store_name(&self) -> &str {
        (**self).store_name()
    }
}
