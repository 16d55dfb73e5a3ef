use {
    crate::domain::diff::diff,
    crate::domain::error::AuditError,
    crate::domain::snapshot::{ChangeKind, EntityRef},
    crate::domain::store::SnapshotStore,
};

/// Removes snapshots that add no information to an entity's log.
///
/// Walks the log newest-to-oldest in adjacent pairs and deletes the newer
/// snapshot of any pair whose diff is empty. Because only the newer element
/// is ever deleted, each comparison already runs against the last surviving
/// entry, so a chain of equal snapshots collapses into its oldest member in
/// a single pass. A `Created` snapshot is never a deletion candidate.
///
/// Idempotent and safe to re-run after an interruption: a skipped or failed
/// pass only leaves extra no-op snapshots behind.
///
/// Returns the number of snapshots removed.
pub async fn collapse_noops(
    store: &dyn SnapshotStore,
    entity: &EntityRef,
) -> Result<usize, AuditError> {
    let log = store.list_by_entity(entity).await?;

    let mut removed = 0;
    for pair in log.windows(2) {
        let (newer, older) = (&pair[0], &pair[1]);
        if newer.change_kind() == ChangeKind::Created {
            continue;
        }
        if diff(newer, older)?.is_empty() {
            store.delete_snapshot(entity, newer.id()).await?;
            removed += 1;
        }
    }

    Ok(removed)
}
