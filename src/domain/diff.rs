use {
    super::error::AuditError,
    super::snapshot::{FieldValue, Snapshot},
};

/// One field whose value differs between two snapshots. Values are the raw
/// recorded `FieldValue`s; label resolution and display rendering happen in
/// the timeline assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub name: String,
    pub old: FieldValue,
    pub new: FieldValue,
}

/// Field-level delta between two snapshots of the same entity, in the order
/// the fields are declared on `newer`.
///
/// Reference fields compare by `(ref_type, ref_id)`; a drifted display label
/// alone is not a change. An empty result marks the pair as a no-op — the
/// contract the deduplication pass relies on.
///
/// Passing snapshots of different entities, or snapshots whose field-name
/// sets disagree, is a programming error and fails fast.
pub fn diff(newer: &Snapshot, older: &Snapshot) -> Result<Vec<FieldChange>, AuditError> {
    if newer.entity() != older.entity() {
        return Err(AuditError::EntityMismatch {
            left: newer.entity().to_string(),
            right: older.entity().to_string(),
        });
    }

    // Field names are unique within a set, so a size mismatch means one
    // side carries a field the other lacks. The loop below catches fields
    // missing on `older`; this catches the reverse direction.
    if newer.fields().len() != older.fields().len() {
        if let Some(field) = older
            .fields()
            .iter()
            .map(|(name, _)| name)
            .find(|name| newer.fields().get(name).is_none())
        {
            return Err(AuditError::MissingField {
                snapshot_id: newer.id().as_i64(),
                field: field.to_string(),
            });
        }
    }

    let mut changes = Vec::new();
    for (name, new_value) in newer.fields().iter() {
        let old_value = older.fields().get(name).ok_or(AuditError::MissingField {
            snapshot_id: older.id().as_i64(),
            field: name.to_string(),
        })?;

        if !new_value.same_value(old_value) {
            changes.push(FieldChange {
                name: name.to_string(),
                old: old_value.clone(),
                new: new_value.clone(),
            });
        }
    }

    Ok(changes)
}
