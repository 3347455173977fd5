//! Error types for the resolution pipeline and its collaborators

use thiserror::Error;

/// Errors raised by a [`TranslationStore`](crate::TranslationStore) implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store was constructed with unusable settings
    #[error("Store configuration error: {0}")]
    Config(String),
    /// The store could not be reached
    #[error("Network error: {0}")]
    Network(String),
    /// The store answered with a non-success status
    #[error("Store responded with status {status}: {body}")]
    Status { status: u16, body: String },
    /// The store answered with a body we could not decode
    #[error("Failed to decode store response: {0}")]
    Decode(String),
    /// A lock guarding in-process state was poisoned by a panicking writer
    #[error("Store state is poisoned")]
    Poisoned,
    /// The store refused the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Reading or writing a translatable field failed
///
/// These never abort a pipeline run: the field is logged and skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldAccessError {
    /// The entity does not declare the requested field
    #[error("'{scope}' has no translatable field '{field}'")]
    UnknownField { scope: String, field: String },
    /// The field holds a value that cannot take a translated string
    #[error("Field '{field}' holds a {found} value and cannot take a translation")]
    TypeMismatch { field: String, found: String },
    /// The field holds a value that has no source string form
    #[error("Field '{field}' cannot be read as a source value: {reason}")]
    Unreadable { field: String, reason: String },
}

/// A composite key string could not be decoded
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Composite key '{0}' has no '#' separator")]
    MissingSourceSeparator(String),
    #[error("Word key '{0}' has no '.' separator")]
    MissingFieldSeparator(String),
    #[error("Word key '{0}' has an empty scope or field")]
    EmptySegment(String),
}

/// Errors while loading schemas or record fixtures from disk
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid schema for '{type_name}': {message}")]
    InvalidSchema { type_name: String, message: String },
}

/// Errors while building a [`ResolverConfig`](crate::ResolverConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value '{value}' for {variable}")]
    InvalidValue { variable: String, value: String },
}

/// A pipeline run failed
///
/// Only store failures escape the pipeline; everything else is logged and skipped.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Translation lookup failed: {0}")]
    Lookup(#[source] StoreError),
    #[error("Translation initialization failed: {0}")]
    Initialize(#[source] StoreError),
}

/// Result type for pipeline runs
pub type ResolveResult<T> = Result<T, ResolveError>;
