//! Write-back of fetched translations

use crate::key::TranslationKey;
use crate::metadata::TranslatableEntity;
use crate::payload::TranslationPayload;
use crate::record::RecordIndex;
use tracing::warn;

/// Overwrite every translatable field that has a stored, non-empty translation
///
/// Returns the number of fields written.
pub fn apply_translations<P: TranslationPayload + ?Sized>(
    payload: &mut P,
    index: &RecordIndex<'_>,
) -> usize {
    payload
        .entities_mut()
        .into_iter()
        .map(|entity| apply_entity(entity, index))
        .sum()
}

/// Translate the fields of one entity
///
/// Each field's key is computed from its value before any write, so a
/// translated value is never matched a second time. Fields without a
/// satisfied record keep their value; write failures are logged and skipped.
pub fn apply_entity(entity: &mut dyn TranslatableEntity, index: &RecordIndex<'_>) -> usize {
    let Some(scope) = entity.scope().map(str::to_owned) else {
        return 0;
    };

    let mut pending = Vec::new();
    for field in entity.translatable_fields() {
        let value = match entity.read_field(field) {
            Ok(Some(value)) if !value.is_blank() => value,
            Ok(_) => continue,
            Err(err) => {
                warn!(scope = %scope, field, error = %err, "Skipping unreadable translatable field");
                continue;
            }
        };
        let key = TranslationKey::new(scope.as_str(), field, value.into_string()).encode();
        if let Some(target) = index.target_for(&key) {
            pending.push((field.to_owned(), target));
        }
    }

    let mut written = 0;
    for (field, target) in pending {
        match entity.write_field(&field, target) {
            Ok(()) => written += 1,
            Err(err) => {
                warn!(scope = %scope, field = %field, error = %err, "Failed to write translation");
            }
        }
    }
    written
}
