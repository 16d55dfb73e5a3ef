use {
    crate::domain::annotation::Tag,
    crate::domain::error::AuditError,
    crate::domain::id::SnapshotId,
    crate::domain::snapshot::{EntityRef, NewSnapshot, Snapshot},
    crate::domain::store::{SnapshotStore, TagStore},
    chrono::Utc,
    std::collections::HashMap,
    std::sync::Mutex,
    std::{future::Future, pin::Pin},
    uuid::Uuid,
};

/// In-memory backend for embedded hosts and the test suite. Logs are kept
/// oldest-first per entity; reads reverse into the newest-first contract.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    logs: HashMap<EntityRef, Vec<Snapshot>>,
    tags: HashMap<String, Tag>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning only happens if a holder panicked; propagating the
        // inner state is still sound for an in-memory test store.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SnapshotStore for MemoryStore {
    fn append(
        &self,
        snapshot: NewSnapshot,
    ) -> Pin<Box<dyn Future<Output = Result<Snapshot, AuditError>> + Send + '_>> {
        Box::pin(async move {
            let entity = snapshot.entity.clone();

            // Id assignment and log insertion happen under one lock so
            // concurrent appends cannot land out of id order.
            let mut inner = self.lock();
            inner.next_id += 1;
            let id = SnapshotId::new(inner.next_id);
            let stored = Snapshot::from_parts(id, snapshot, Utc::now());
            inner.logs.entry(entity).or_default().push(stored.clone());
            Ok(stored)
        })
    }

    fn list_by_entity(
        &self,
        entity: &EntityRef,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Snapshot>, AuditError>> + Send + '_>> {
        let entity = entity.clone();
        Box::pin(async move {
            let inner = self.lock();
            let mut log = inner.logs.get(&entity).cloned().unwrap_or_default();
            log.reverse();
            Ok(log)
        })
    }

    fn delete_snapshot(
        &self,
        entity: &EntityRef,
        id: SnapshotId,
    ) -> Pin<Box<dyn Future<Output = Result<(), AuditError>> + Send + '_>> {
        let entity = entity.clone();
        Box::pin(async move {
            let mut inner = self.lock();
            if let Some(log) = inner.logs.get_mut(&entity) {
                log.retain(|s| s.id() != id);
            }
            Ok(())
        })
    }
}

impl TagStore for MemoryStore {
    fn get_or_create(
        &self,
        title: &str,
        highlight: bool,
    ) -> Pin<Box<dyn Future<Output = Result<Tag, AuditError>> + Send + '_>> {
        let title = title.to_string();
        Box::pin(async move {
            let mut inner = self.lock();
            let tag = inner
                .tags
                .entry(title.clone())
                .or_insert_with(|| Tag {
                    id: Uuid::now_v7(),
                    title,
                    highlight,
                })
                .clone();
            Ok(tag)
        })
    }
}
