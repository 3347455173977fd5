//! Condition collection
//!
//! Walks a payload and emits one [`TranslationKey`] per non-empty translatable
//! value. Duplicates are kept here; the scheduler removes them.

use crate::key::TranslationKey;
use crate::metadata::TranslatableEntity;
use crate::payload::TranslationPayload;
use tracing::warn;

/// Collect lookup conditions for every entity in the payload, in order
pub fn collect_conditions<P: TranslationPayload + ?Sized>(payload: &P) -> Vec<TranslationKey> {
    let mut conditions = Vec::new();
    for entity in payload.entities() {
        collect_entity(entity, &mut conditions);
    }
    conditions
}

/// Append the conditions of a single entity
///
/// Untagged entities contribute nothing. A field that cannot be read is
/// logged and skipped without affecting its siblings.
pub fn collect_entity(entity: &dyn TranslatableEntity, conditions: &mut Vec<TranslationKey>) {
    let Some(scope) = entity.scope() else {
        return;
    };

    for field in entity.translatable_fields() {
        match entity.read_field(field) {
            Ok(Some(value)) if !value.is_blank() => {
                conditions.push(TranslationKey::new(scope, field, value.into_string()));
            }
            Ok(_) => {}
            Err(err) => {
                warn!(scope, field, error = %err, "Skipping unreadable translatable field");
            }
        }
    }
}
