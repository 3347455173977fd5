//! Translation rows and the request shapes exchanged with the store

use crate::key;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Translation namespace selected by the caller
///
/// The pipeline never interprets it; it is handed to the store unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientType {
    Web,
    App,
    Admin,
    OpenApi,
}

impl ClientType {
    pub const ALL: [ClientType; 4] = [
        ClientType::Web,
        ClientType::App,
        ClientType::Admin,
        ClientType::OpenApi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Web => "WEB",
            ClientType::App => "APP",
            ClientType::Admin => "ADMIN",
            ClientType::OpenApi => "OPEN_API",
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown client type '{0}' (expected one of WEB, APP, ADMIN, OPEN_API)")]
pub struct ParseClientTypeError(pub String);

impl FromStr for ClientType {
    type Err = ParseClientTypeError;

    /// Case-insensitive; `-` is accepted in place of `_`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        ClientType::ALL
            .into_iter()
            .find(|client| client.as_str() == normalized)
            .ok_or_else(|| ParseClientTypeError(s.to_string()))
    }
}

/// One stored translation row
///
/// An absent or empty `word_target_value` means the row exists but nobody has
/// translated it yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRecord {
    pub word_key: String,
    pub word_source_value: String,
    #[serde(default)]
    pub word_target_value: Option<String>,
    pub client_type: ClientType,
}

impl TranslationRecord {
    /// An untranslated row
    pub fn new(
        client_type: ClientType,
        word_key: impl Into<String>,
        word_source_value: impl Into<String>,
    ) -> Self {
        Self {
            word_key: word_key.into(),
            word_source_value: word_source_value.into(),
            word_target_value: None,
            client_type,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.word_target_value = Some(target.into());
        self
    }

    /// `wordKey#wordSourceValue`
    pub fn composite_key(&self) -> String {
        key::composite(&self.word_key, &self.word_source_value)
    }

    /// The target value, if one is present and non-empty
    pub fn target(&self) -> Option<&str> {
        self.word_target_value
            .as_deref()
            .filter(|target| !target.is_empty())
    }

    pub fn is_translated(&self) -> bool {
        self.target().is_some()
    }
}

/// Word key → distinct source values awaiting a translation row
pub type SourceMap = BTreeMap<String, Vec<String>>;

/// Body of a batched lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub client_type: ClientType,
    pub conditions: Vec<String>,
}

/// Body of a batched "ensure these rows exist" request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeRequest {
    pub client_type: ClientType,
    pub source_map: SourceMap,
}

/// Fetched records indexed by composite key for one pipeline run
///
/// `satisfied` keeps the first record per key that carries a non-empty target;
/// `resolved` holds every key that has any row at all.
#[derive(Debug, Default)]
pub struct RecordIndex<'r> {
    satisfied: HashMap<String, &'r str>,
    resolved: HashSet<String>,
}

impl<'r> RecordIndex<'r> {
    pub fn new(records: &'r [TranslationRecord]) -> Self {
        let mut index = Self::default();
        for record in records {
            let key = record.composite_key();
            if let Some(target) = record.target() {
                index.satisfied.entry(key.clone()).or_insert(target);
            }
            index.resolved.insert(key);
        }
        index
    }

    /// Translation to write for a composite key
    pub fn target_for(&self, composite_key: &str) -> Option<&'r str> {
        self.satisfied.get(composite_key).copied()
    }

    /// Whether the store already has a row for the key, translated or not
    pub fn is_resolved(&self, composite_key: &str) -> bool {
        self.resolved.contains(composite_key)
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("WEB", ClientType::Web)]
    #[case("app", ClientType::App)]
    #[case(" Admin ", ClientType::Admin)]
    #[case("open-api", ClientType::OpenApi)]
    #[case("OPEN_API", ClientType::OpenApi)]
    fn test_parse_client_type(#[case] raw: &str, #[case] expected: ClientType) {
        assert_eq!(raw.parse::<ClientType>(), Ok(expected));
    }

    #[test]
    fn test_parse_unknown_client_type() {
        let err = "kiosk".parse::<ClientType>().unwrap_err();
        assert!(err.to_string().contains("kiosk"));
    }

    #[test]
    fn test_record_wire_format() {
        let record = TranslationRecord::new(ClientType::OpenApi, "User.status", "ACTIVE")
            .with_target("激活");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "wordKey": "User.status",
                "wordSourceValue": "ACTIVE",
                "wordTargetValue": "激活",
                "clientType": "OPEN_API"
            })
        );
    }

    #[test]
    fn test_record_without_target_field_deserializes() {
        let record: TranslationRecord = serde_json::from_str(
            r#"{"wordKey":"User.status","wordSourceValue":"ACTIVE","clientType":"WEB"}"#,
        )
        .unwrap();
        assert_eq!(record.word_target_value, None);
        assert!(!record.is_translated());
    }

    #[test]
    fn test_empty_target_is_not_a_translation() {
        let record = TranslationRecord::new(ClientType::Web, "User.status", "ACTIVE").with_target("");
        assert_eq!(record.target(), None);
        assert_eq!(record.composite_key(), "User.status#ACTIVE");
    }

    #[test]
    fn test_index_first_translated_record_wins() {
        let records = vec![
            TranslationRecord::new(ClientType::Web, "User.status", "ACTIVE").with_target(""),
            TranslationRecord::new(ClientType::Web, "User.status", "ACTIVE").with_target("激活"),
            TranslationRecord::new(ClientType::Web, "User.status", "ACTIVE").with_target("启用"),
        ];
        let index = RecordIndex::new(&records);
        assert_eq!(index.target_for("User.status#ACTIVE"), Some("激活"));
    }

    #[test]
    fn test_index_untranslated_row_is_resolved_but_not_satisfied() {
        let records = vec![TranslationRecord::new(ClientType::Web, "User.status", "LOCKED")];
        let index = RecordIndex::new(&records);
        assert!(index.is_resolved("User.status#LOCKED"));
        assert_eq!(index.target_for("User.status#LOCKED"), None);
        assert!(!index.is_resolved("User.status#ACTIVE"));
    }
}
