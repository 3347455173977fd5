//! Composite translation keys
//!
//! The storage tier addresses translations with plain strings:
//!
//! - word key: `scope.field` (e.g. `User.status`)
//! - composite key: `scope.field#sourceValue` (e.g. `User.status#ACTIVE`)
//!
//! Inside the pipeline keys are kept structured ([`WordKey`], [`TranslationKey`])
//! and only turned into strings at the store boundary.

use crate::error::KeyError;
use std::fmt;
use std::str::FromStr;

/// Separates the scope from the field name in a word key
pub const FIELD_SEPARATOR: char = '.';

/// Separates the word key from the source value in a composite key
pub const SOURCE_SEPARATOR: char = '#';

/// Join a word key and a source value into the wire-level composite key
pub fn composite(word_key: &str, source_value: &str) -> String {
    let mut key = String::with_capacity(word_key.len() + source_value.len() + 1);
    key.push_str(word_key);
    key.push(SOURCE_SEPARATOR);
    key.push_str(source_value);
    key
}

/// `scope.field`, shared by every instance of a translatable type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordKey {
    scope: String,
    field: String,
}

impl WordKey {
    pub fn new(scope: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            field: field.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Parse `scope.field`
    ///
    /// Scopes may themselves contain dots (`billing.Invoice.title`), field names
    /// never do, so the split happens at the last separator.
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        let (scope, field) = raw
            .rsplit_once(FIELD_SEPARATOR)
            .ok_or_else(|| KeyError::MissingFieldSeparator(raw.to_string()))?;
        if scope.is_empty() || field.is_empty() {
            return Err(KeyError::EmptySegment(raw.to_string()));
        }
        Ok(Self::new(scope, field))
    }
}

impl fmt::Display for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.scope, FIELD_SEPARATOR, self.field)
    }
}

impl FromStr for WordKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One translatable slot together with its current source content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationKey {
    word: WordKey,
    source_value: String,
}

impl TranslationKey {
    pub fn new(
        scope: impl Into<String>,
        field: impl Into<String>,
        source_value: impl Into<String>,
    ) -> Self {
        Self {
            word: WordKey::new(scope, field),
            source_value: source_value.into(),
        }
    }

    pub fn word_key(&self) -> &WordKey {
        &self.word
    }

    pub fn source_value(&self) -> &str {
        &self.source_value
    }

    /// Split into the word key and the source value
    pub fn into_parts(self) -> (WordKey, String) {
        (self.word, self.source_value)
    }

    /// Encode as `scope.field#sourceValue`
    pub fn encode(&self) -> String {
        composite(&self.word.to_string(), &self.source_value)
    }

    /// Decode `scope.field#sourceValue`
    ///
    /// Word keys never contain `#`, so everything after the first separator is
    /// the source value, including any further `#` characters.
    pub fn decode(raw: &str) -> Result<Self, KeyError> {
        let (word, source_value) = raw
            .split_once(SOURCE_SEPARATOR)
            .ok_or_else(|| KeyError::MissingSourceSeparator(raw.to_string()))?;
        Ok(Self {
            word: WordKey::parse(word)?,
            source_value: source_value.to_string(),
        })
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.word, SOURCE_SEPARATOR, self.source_value)
    }
}

impl FromStr for TranslationKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
