//! Translation store reached over HTTP
//!
//! Speaks the JSON protocol served by `multilingual-web`:
//!
//! - `POST {base}/api/translations/list` with `{"clientType", "conditions"}`,
//!   answered by an array of records
//! - `POST {base}/api/translations/add` with `{"clientType", "sourceMap"}`
//!
//! # Configuration
//!
//! [`HttpStore::from_env`] reads the base URL from `MULTILINGUAL_STORE_URL`
//! and an optional bearer token from `MULTILINGUAL_STORE_TOKEN`.
//!
//! # Example
//!
//! ```ignore
//! use multilingual::{ClientType, Resolver};
//! use multilingual_client::HttpStore;
//!
//! let resolver = Resolver::new(HttpStore::from_env()?);
//! resolver.resolve(ClientType::Web, &mut users).await?;
//! ```

use async_trait::async_trait;
use multilingual::record::{InitializeRequest, LookupRequest};
use multilingual::{ClientType, SourceMap, StoreError, StoreResult, TranslationRecord, TranslationStore};
use std::time::Duration;
use tracing::debug;

pub const STORE_URL_ENV: &str = "MULTILINGUAL_STORE_URL";
pub const STORE_TOKEN_ENV: &str = "MULTILINGUAL_STORE_TOKEN";

/// Client for a remote translation table
#[derive(Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpStore {
    /// Maximum number of conditions sent in one lookup call
    ///
    /// Larger lookups are split into sequential calls and the answers joined.
    const MAX_CONDITIONS_PER_REQUEST: usize = 500;

    const TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a client for the service at `base_url`
    ///
    /// # Errors
    ///
    /// `StoreError::Config` when the URL is empty or not http(s), or the HTTP
    /// client cannot be built.
    pub fn new(base_url: impl Into<String>) -> StoreResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(StoreError::Config("Store URL cannot be empty".to_string()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(StoreError::Config(format!(
                "Store URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(|e| StoreError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Create a client from `MULTILINGUAL_STORE_URL` (and `MULTILINGUAL_STORE_TOKEN` when set)
    pub fn from_env() -> StoreResult<Self> {
        let base_url = std::env::var(STORE_URL_ENV).map_err(|_| {
            StoreError::Config(format!("{} environment variable not set", STORE_URL_ENV))
        })?;
        let store = Self::new(base_url)?;
        Ok(match std::env::var(STORE_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => store.with_token(token),
            _ => store,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn chunk_conditions(conditions: &[String]) -> Vec<&[String]> {
        conditions.chunks(Self::MAX_CONDITIONS_PER_REQUEST).collect()
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.client.post(self.endpoint(path));
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> StoreResult<reqwest::Response> {
        let response = self
            .post(path)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn list_chunk(
        &self,
        client_type: ClientType,
        conditions: &[String],
    ) -> StoreResult<Vec<TranslationRecord>> {
        let request = LookupRequest {
            client_type,
            conditions: conditions.to_vec(),
        };
        self.send("/api/translations/list", &request)
            .await?
            .json::<Vec<TranslationRecord>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

impl std::fmt::Debug for HttpStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStore")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[async_trait]
impl TranslationStore for HttpStore {
    async fn list_translations(
        &self,
        client_type: ClientType,
        conditions: &[String],
    ) -> StoreResult<Vec<TranslationRecord>> {
        if conditions.is_empty() {
            return Ok(Vec::new());
        }

        let chunks = Self::chunk_conditions(conditions);
        debug!(
            "Looking up {} conditions in {} request(s) at {}",
            conditions.len(),
            chunks.len(),
            self.base_url
        );

        let mut records = Vec::new();
        for chunk in chunks {
            records.extend(self.list_chunk(client_type, chunk).await?);
        }
        Ok(records)
    }

    async fn add_translations(
        &self,
        client_type: ClientType,
        source_map: &SourceMap,
    ) -> StoreResult<()> {
        if source_map.is_empty() {
            return Ok(());
        }

        let request = InitializeRequest {
            client_type,
            source_map: source_map.clone(),
        };
        self.send("/api/translations/add", &request).await?;
        Ok(())
    }

    fn store_name(&self) -> &str {
        "HTTP Store"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Initialization Tests ==========

    #[test]
    fn test_new_with_valid_url() {
        let store = HttpStore::new("http://localhost:3000/").unwrap();
        assert_eq!(store.base_url(), "http://localhost:3000");
        assert_eq!(store.store_name(), "HTTP Store");
    }

    #[test]
    fn test_new_with_empty_url() {
        match HttpStore::new("  ") {
            Err(StoreError::Config(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_new_with_unsupported_scheme() {
        match HttpStore::new("ftp://translations.internal") {
            Err(StoreError::Config(msg)) => assert!(msg.contains("http")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_env_without_url() {
        unsafe {
            std::env::remove_var(STORE_URL_ENV);
        }
        match HttpStore::from_env() {
            Err(StoreError::Config(msg)) => assert!(msg.contains("not set")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_endpoint() {
        let store = HttpStore::new("https://i18n.example.com/store").unwrap();
        assert_eq!(
            store.endpoint("/api/translations/list"),
            "https://i18n.example.com/store/api/translations/list"
        );
    }

    // ========== Chunking Tests ==========

    #[test]
    fn test_chunk_under_limit() {
        let conditions = vec!["User.status#ACTIVE".to_string()];
        let chunks = HttpStore::chunk_conditions(&conditions);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_chunk_over_limit() {
        let conditions = (0..1200)
            .map(|i| format!("User.id#{}", i))
            .collect::<Vec<_>>();
        let chunks = HttpStore::chunk_conditions(&conditions);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 500);
        assert_eq!(chunks[2].len(), 200);
    }

    // ========== Short Circuit Tests ==========

    #[tokio::test]
    async fn test_empty_lookup_skips_network() {
        // nothing listens here; an actual request would fail
        let store = HttpStore::new("http://127.0.0.1:9").unwrap();
        let records = store.list_translations(ClientType::Web, &[]).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_empty_initialization_skips_network() {
        let store = HttpStore::new("http://127.0.0.1:9").unwrap();
        store
            .add_translations(ClientType::Web, &SourceMap::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_store_is_network_error() {
        let store = HttpStore::new("http://127.0.0.1:9").unwrap();
        let result = store
            .list_translations(ClientType::Web, &["User.status#ACTIVE".to_string()])
            .await;
        assert!(matches!(result, Err(StoreError::Network(_))));
    }

    // ========== Debug Implementation Test ==========

    #[test]
    fn test_debug_output() {
        let store = HttpStore::new("http://localhost:3000")
            .unwrap()
            .with_token("secret-token");
        let debug_str = format!("{:?}", store);
        assert!(debug_str.contains("***"));
        assert!(!debug_str.contains("secret-token"));
    }

    // ========== Integration Tests (require a running store) ==========

    #[tokio::test]
    #[ignore] // Run with: cargo test --ignored
    async fn test_real_store_round_trip() {
        if std::env::var(STORE_URL_ENV).is_err() {
            eprintln!("Skipping: {} not set", STORE_URL_ENV);
            return;
        }

        let store = HttpStore::from_env().unwrap();
        let mut source_map = SourceMap::new();
        source_map.insert("Probe.status".to_string(), vec!["PING".to_string()]);
        store
            .add_translations(ClientType::Web, &source_map)
            .await
            .unwrap();

        let records = store
            .list_translations(ClientType::Web, &["Probe.status#PING".to_string()])
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].word_source_value, "PING");
    }
}
