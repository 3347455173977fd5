//! Pipeline orchestration
//!
//! One run over a result: collect conditions, look them up in one batch,
//! write translations back in place, then initialize whatever the store has
//! never seen. The store is touched at most twice and not at all when the
//! result carries nothing translatable.

use crate::applier::apply_translations;
use crate::collector::collect_conditions;
use crate::config::{InitializeFailurePolicy, LookupFailurePolicy, ResolverConfig};
use crate::dynamic::SchemaRegistry;
use crate::error::{ResolveError, ResolveResult};
use crate::gap::detect_gaps;
use crate::key::TranslationKey;
use crate::payload::{DataGetter, Identity, TranslationPayload};
use crate::record::{ClientType, RecordIndex};
use crate::scheduler::schedule_initialization;
use crate::store::TranslationStore;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, warn};

/// What one pipeline run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReport {
    /// Keys collected from the result, duplicates included
    pub conditions: usize,
    /// Records returned by the lookup
    pub records: usize,
    /// Fields overwritten with a translation
    pub translated: usize,
    /// Source values sent for initialization
    pub initialized: usize,
    /// The lookup failed and the result was returned untranslated
    pub degraded: bool,
}

impl ResolveReport {
    /// True when the result had nothing to translate
    pub fn is_noop(&self) -> bool {
        self.conditions == 0
    }
}

/// Runs the resolution pipeline against one store
#[derive(Debug, Clone)]
pub struct Resolver<S> {
    store: S,
    config: ResolverConfig,
}

impl<S: TranslationStore> Resolver<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Wrap operations whose results should be resolved for `client_type`
    pub fn translate(&self, client_type: ClientType) -> TranslateOperation<'_, S> {
        TranslateOperation::new(self, client_type)
    }

    /// Translate every tagged field in `payload` in place
    pub async fn resolve<P>(
        &self,
        client_type: ClientType,
        payload: &mut P,
    ) -> ResolveResult<ResolveReport>
    where
        P: TranslationPayload + Send + ?Sized,
    {
        let conditions = collect_conditions(payload);
        let mut report = ResolveReport {
            conditions: conditions.len(),
            ..ResolveReport::default()
        };
        if conditions.is_empty() {
            debug!("No translatable values, skipping lookup");
            return Ok(report);
        }

        let encoded: Vec<String> = conditions.iter().map(TranslationKey::encode).collect();
        debug!(
            store = self.store.store_name(),
            client_type = %client_type,
            conditions = encoded.len(),
            "Looking up translations"
        );
        let records = match self.store.list_translations(client_type, &encoded).await {
            Ok(records) => records,
            Err(e) => match self.config.lookup_failure {
                LookupFailurePolicy::Propagate => return Err(ResolveError::Lookup(e)),
                LookupFailurePolicy::Degrade => {
                    warn!("Translation lookup failed, returning result untranslated: {}", e);
                    report.degraded = true;
                    return Ok(report);
                }
            },
        };
        report.records = records.len();

        let gaps = {
            let index = RecordIndex::new(&records);
            if !index.is_empty() {
                report.translated = apply_translations(payload, &index);
            }
            detect_gaps(conditions, &index)
        };
        report.initialized = self.initialize(client_type, gaps).await?;

        debug!(
            translated = report.translated,
            initialized = report.initialized,
            "Resolution finished"
        );
        Ok(report)
    }

    /// Translate the part of `result` selected by `getter`
    pub async fn resolve_with<R, G>(
        &self,
        client_type: ClientType,
        result: &mut R,
        getter: &G,
    ) -> ResolveResult<ResolveReport>
    where
        R: Send + ?Sized,
        G: DataGetter<R> + Sync + ?Sized,
        G::Data: Send,
    {
        let data = getter.data(result);
        self.resolve(client_type, data).await
    }

    /// Resolve a copy of `payload`, leaving the original untouched
    pub async fn resolved<P>(
        &self,
        client_type: ClientType,
        payload: &P,
    ) -> ResolveResult<(P, ResolveReport)>
    where
        P: TranslationPayload + Clone + Send + Sync,
    {
        let mut copy = payload.clone();
        let report = self.resolve(client_type, &mut copy).await?;
        Ok((copy, report))
    }

    /// Resolve the records found at a JSON pointer inside `document`
    ///
    /// `""` selects the whole document. A pointer that matches nothing leaves
    /// the document as it is.
    pub async fn resolve_json(
        &self,
        client_type: ClientType,
        registry: &SchemaRegistry,
        document: &mut Value,
        pointer: &str,
    ) -> ResolveResult<ResolveReport> {
        let Some(target) = document.pointer_mut(pointer) else {
            debug!("Nothing at '{}', skipping resolution", pointer);
            return Ok(ResolveReport::default());
        };

        let mut payload = registry.payload(target.take());
        let outcome = self.resolve(client_type, &mut payload).await;
        *target = payload.into_value();
        outcome
    }

    async fn initialize(
        &self,
        client_type: ClientType,
        gaps: Vec<TranslationKey>,
    ) -> ResolveResult<usize> {
        match schedule_initialization(&self.store, client_type, gaps).await {
            Ok(pending) => Ok(pending),
            Err(e) => match self.config.initialize_failure {
                InitializeFailurePolicy::Log => {
                    warn!("Failed to initialize missing translations: {}", e);
                    Ok(0)
                }
                InitializeFailurePolicy::Propagate => Err(ResolveError::Initialize(e)),
            },
        }
    }
}

/// Runs an operation, then resolves its result before handing it back
///
/// ```ignore
/// let user = resolver
///     .translate(ClientType::Web)
///     .run(|| repository.find_user(id))
///     .await?;
/// ```
pub struct TranslateOperation<'r, S, G = Identity> {
    resolver: &'r Resolver<S>,
    client_type: ClientType,
    getter: G,
}

impl<'r, S: TranslationStore> TranslateOperation<'r, S, Identity> {
    pub fn new(resolver: &'r Resolver<S>, client_type: ClientType) -> Self {
        Self {
            resolver,
            client_type,
            getter: Identity,
        }
    }
}

impl<'r, S: TranslationStore, G> TranslateOperation<'r, S, G> {
    /// Resolve only the part of the result selected by `getter`
    pub fn with_getter<H>(self, getter: H) -> TranslateOperation<'r, S, H> {
        TranslateOperation {
            resolver: self.resolver,
            client_type: self.client_type,
            getter,
        }
    }

    /// Await `operation`; on success resolve its result in place and return it
    ///
    /// Operation errors pass through untouched and the store is never called.
    pub async fn run<F, Fut, R, E>(&self, operation: F) -> Result<R, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        R: Send,
        G: DataGetter<R> + Sync,
        G::Data: Send,
        E: From<ResolveError>,
    {
        let mut result = operation().await?;
        self.resolver
            .resolve_with(self.client_type, &mut result, &self.getter)
            .await?;
        Ok(result)
    }
}
