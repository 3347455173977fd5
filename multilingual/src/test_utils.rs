//! Fixtures shared by the unit tests
#![cfg(test)]

use crate::record::{ClientType, TranslationRecord};
use crate::translatable;

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct User {
    pub id: u64,
    pub status: String,
    pub nickname: Option<String>,
    pub level: i32,
}

translatable!(User { status, nickname, level });

/// A second view type sharing the `User` scope
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct UserVo {
    pub status: String,
}

translatable!(#[scope = "User"] UserVo { status });

/// A type with no translation metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Untagged {
    pub status: String,
}

impl crate::TranslatableEntity for Untagged {
    fn scope(&self) -> Option<&str> {
        None
    }

    fn translatable_fields(&self) -> Vec<&str> {
        Vec::new()
    }

    fn read_field(
        &self,
        field: &str,
    ) -> Result<Option<crate::SourceValue>, crate::FieldAccessError> {
        Err(crate::FieldAccessError::UnknownField {
            scope: "Untagged".to_string(),
            field: field.to_string(),
        })
    }

    fn write_field(&mut self, field: &str, _translated: &str) -> Result<(), crate::FieldAccessError> {
        Err(crate::FieldAccessError::UnknownField {
            scope: "Untagged".to_string(),
            field: field.to_string(),
        })
    }
}

impl crate::TranslationPayload for Untagged {
    fn entities(&self) -> Vec<&dyn crate::TranslatableEntity> {
        vec![self as &dyn crate::TranslatableEntity]
    }

    fn entities_mut(&mut self) -> Vec<&mut dyn crate::TranslatableEntity> {
        vec![self as &mut dyn crate::TranslatableEntity]
    }
}

/// Paged operation result whose translatable data is nested
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Page {
    pub items: Vec<User>,
    pub total: usize,
}

pub(crate) fn user(id: u64, status: &str) -> User {
    User {
        id,
        status: status.to_string(),
        nickname: None,
        level: 1,
    }
}

pub(crate) fn record(word_key: &str, source: &str, target: &str) -> TranslationRecord {
    TranslationRecord::new(ClientType::Web, word_key, source).with_target(target)
}

pub(crate) fn untranslated(word_key: &str, source: &str) -> TranslationRecord {
    TranslationRecord::new(ClientType::Web, word_key, source)
}
