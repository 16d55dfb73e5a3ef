use {
    super::annotation::Tag,
    super::error::AuditError,
    super::id::SnapshotId,
    super::snapshot::{EntityRef, NewSnapshot, Snapshot},
    std::{future::Future, pin::Pin},
};

/// Append-only ordered log of immutable snapshots, one log per entity.
///
/// `append` is the durability point of the write path and must assign ids
/// atomically per entity; `delete_snapshot` exists only for the
/// deduplication pass.
pub trait SnapshotStore: Send + Sync {
    fn append(
        &self,
        snapshot: NewSnapshot,
    ) -> Pin<Box<dyn Future<Output = Result<Snapshot, AuditError>> + Send + '_>>;

    /// Full log for an entity, newest first. Re-queryable, not a live
    /// subscription.
    fn list_by_entity(
        &self,
        entity: &EntityRef,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Snapshot>, AuditError>> + Send + '_>>;

    fn delete_snapshot(
        &self,
        entity: &EntityRef,
        id: SnapshotId,
    ) -> Pin<Box<dyn Future<Output = Result<(), AuditError>> + Send + '_>>;
}

/// Shared tag set, deduplicated by title. The storage layer enforces title
/// uniqueness so concurrent get-or-create calls for a new title cannot mint
/// two tags.
pub trait TagStore: Send + Sync {
    fn get_or_create(
        &self,
        title: &str,
        highlight: bool,
    ) -> Pin<Box<dyn Future<Output = Result<Tag, AuditError>> + Send + '_>>;
}
