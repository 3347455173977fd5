//! Resolve translatable fields on operation results against a stored
//! translation table.
//!
//! Types opt in with [`translatable!`], naming a scope and the fields to
//! translate. A [`Resolver`] then takes any result (one entity, `None`, or a
//! collection), looks up every `scope.field#source` key in a single batch,
//! writes the stored translations back in place and asks the store to create
//! rows for source values it has never seen.
//!
//! ```
//! use multilingual::store::MemoryStore;
//! use multilingual::{ClientType, Resolver, translatable};
//!
//! #[derive(Debug)]
//! struct User {
//!     id: u64,
//!     status: String,
//! }
//!
//! translatable!(User { status });
//!
//! # tokio_test_block(async {
//! let store = MemoryStore::new();
//! store.set_target(ClientType::Web, "User.status", "ACTIVE", "激活").unwrap();
//!
//! let resolver = Resolver::new(store);
//! let mut user = User { id: 1, status: "ACTIVE".to_string() };
//! resolver.resolve(ClientType::Web, &mut user).await.unwrap();
//! assert_eq!(user.status, "激活");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

pub mod applier;
pub mod collector;
pub mod config;
pub mod dynamic;
pub mod error;
pub mod gap;
pub mod key;
pub mod loader;
pub mod metadata;
pub mod payload;
pub mod pipeline;
pub mod record;
pub mod scheduler;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use config::{InitializeFailurePolicy, LookupFailurePolicy, ResolverConfig};
pub use dynamic::{DynamicPayload, DynamicRecord, RecordSchema, SchemaDocument, SchemaRegistry};
pub use error::{
    ConfigError, FieldAccessError, KeyError, LoadError, ResolveError, ResolveResult, StoreError,
    StoreResult,
};
pub use key::{TranslationKey, WordKey};
pub use loader::{load_document_from_file, load_records_from_file, load_schemas_from_file};
pub use metadata::{
    EntityDescriptor, FieldDescriptor, SourceValue, Translatable, TranslatableEntity,
    TranslatableValue,
};
pub use payload::{DataGetter, Identity, TranslationPayload};
pub use pipeline::{ResolveReport, Resolver, TranslateOperation};
pub use record::{ClientType, RecordIndex, SourceMap, TranslationRecord};
pub use store::TranslationStore;
