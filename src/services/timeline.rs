use {
    crate::domain::diff::diff,
    crate::domain::error::AuditError,
    crate::domain::provider::{FieldKind, ReferenceResolver, SchemaProvider},
    crate::domain::snapshot::{FieldValue, Snapshot},
    crate::domain::timeline::{ChangeEntry, EntryKind, FieldDiff},
};

/// Projects an entity's (already deduplicated) newest-first log into the
/// human-facing timeline: one `Changes` entry per adjacent pair, attributed
/// to the author of the newer snapshot, and one `Created` entry at the tail.
///
/// Pure read-side projection — safe to invoke repeatedly.
pub fn assemble(
    schema: &dyn SchemaProvider,
    refs: &dyn ReferenceResolver,
    log: &[Snapshot],
) -> Result<Vec<ChangeEntry>, AuditError> {
    let mut entries = Vec::with_capacity(log.len());

    for pair in log.windows(2) {
        let (newer, older) = (&pair[0], &pair[1]);
        let diffs = diff(newer, older)?
            .into_iter()
            .map(|change| {
                let entity_type = &newer.entity().entity_type;
                FieldDiff {
                    field_label: schema
                        .field_label(entity_type, &change.name)
                        .unwrap_or_else(|| change.name.clone()),
                    is_reference: schema.field_kind(entity_type, &change.name)
                        == FieldKind::Reference,
                    old_value: render_value(refs, &change.old),
                    new_value: render_value(refs, &change.new),
                    field_name: change.name,
                }
            })
            .collect();

        entries.push(ChangeEntry {
            kind: EntryKind::Changes,
            snapshot_id: newer.id(),
            previous_id: Some(older.id()),
            author: newer.author().clone(),
            created_at: newer.created_at(),
            annotation: newer.annotation().cloned(),
            diffs,
        });
    }

    if let Some(first) = log.last() {
        entries.push(ChangeEntry {
            kind: EntryKind::Created,
            snapshot_id: first.id(),
            previous_id: None,
            author: first.author().clone(),
            created_at: first.created_at(),
            annotation: first.annotation().cloned(),
            diffs: Vec::new(),
        });
    }

    Ok(entries)
}

/// Renders a recorded value for display. A reference whose target has since
/// been deleted keeps its recorded label, marked `(deleted)` — audit display
/// stays available even when referenced data has decayed.
fn render_value(refs: &dyn ReferenceResolver, value: &FieldValue) -> String {
    match value {
        FieldValue::Reference(r) => match refs.resolve(&r.ref_type, r.ref_id) {
            Some(_) => r.display_label.clone(),
            None => format!("{} (deleted)", r.display_label),
        },
        other => other.to_string(),
    }
}
