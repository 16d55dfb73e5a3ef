use {
    super::{dedup::collapse_noops, timeline},
    crate::domain::annotation::{Annotation, AnnotationDraft},
    crate::domain::error::AuditError,
    crate::domain::id::SnapshotId,
    crate::domain::provider::{EmployeeDirectory, ReferenceResolver, SchemaProvider},
    crate::domain::snapshot::{Author, ChangeKind, EntityRef, FieldSet, NewSnapshot},
    crate::domain::store::{SnapshotStore, TagStore},
    crate::domain::timeline::ChangeEntry,
    std::collections::{HashMap, HashSet},
    std::sync::{Arc, Mutex},
};

/// One entity mutation reported by the host, with everything the engine
/// needs passed explicitly — no ambient request state.
#[derive(Debug, Clone)]
pub struct MutationRecord {
    pub entity: EntityRef,
    pub change_kind: ChangeKind,
    pub fields: FieldSet,
    /// Opaque editor principal; `None` or unresolvable attributes the
    /// snapshot to the system actor.
    pub editor: Option<String>,
    /// `None` means the caller skipped annotation. The snapshot remains an
    /// ordinary dedup candidate either way.
    pub annotation: Option<AnnotationDraft>,
}

/// The audit engine: capture, append, dedup on write; assemble on read.
///
/// Mutations to the same entity are serialized through a per-entity lock
/// held across append + dedup; different entities proceed in parallel.
pub struct AuditTrail {
    store: Arc<dyn SnapshotStore>,
    tags: Arc<dyn TagStore>,
    directory: Arc<dyn EmployeeDirectory>,
    schema: Arc<dyn SchemaProvider>,
    refs: Arc<dyn ReferenceResolver>,
    entity_locks: Mutex<HashMap<EntityRef, Arc<tokio::sync::Mutex<()>>>>,
}

impl AuditTrail {
    pub fn new(
        store: Arc<dyn SnapshotStore>,
        tags: Arc<dyn TagStore>,
        directory: Arc<dyn EmployeeDirectory>,
        schema: Arc<dyn SchemaProvider>,
        refs: Arc<dyn ReferenceResolver>,
    ) -> Self {
        Self {
            store,
            tags,
            directory,
            schema,
            refs,
            entity_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Records one mutation: resolve author and annotation, append the
    /// snapshot, then collapse no-ops.
    ///
    /// The append is the durability point. A dedup failure after it is
    /// logged and swallowed — the log is valid, just non-minimal, and a
    /// later pass cleans it up.
    pub async fn record_mutation(&self, record: MutationRecord) -> Result<SnapshotId, AuditError> {
        let lock = self.entity_lock(&record.entity);
        let _guard = lock.lock().await;

        let author = self.resolve_author(record.editor.as_deref());
        let annotation = match record.annotation {
            Some(draft) => Some(self.resolve_annotation(draft).await?),
            None => None,
        };

        let snapshot = self
            .store
            .append(NewSnapshot {
                entity: record.entity.clone(),
                change_kind: record.change_kind,
                fields: record.fields,
                author,
                annotation,
            })
            .await?;

        match collapse_noops(&*self.store, &record.entity).await {
            Ok(0) => {}
            Ok(removed) => {
                tracing::info!(entity = %record.entity, removed, "collapsed no-op snapshots");
            }
            Err(e) => {
                tracing::warn!(
                    entity = %record.entity,
                    error = %e,
                    "dedup pass failed, leaving log non-minimal"
                );
            }
        }

        Ok(snapshot.id())
    }

    /// Newest-first change narrative for an entity. An entity with no
    /// snapshots yields an empty timeline.
    pub async fn timeline(&self, entity: &EntityRef) -> Result<Vec<ChangeEntry>, AuditError> {
        let log = self.store.list_by_entity(entity).await?;
        timeline::assemble(&*self.schema, &*self.refs, &log)
    }

    fn resolve_author(&self, editor: Option<&str>) -> Author {
        editor
            .and_then(|e| self.directory.resolve_employee(e))
            .map(Author::Employee)
            .unwrap_or_else(Author::bot)
    }

    async fn resolve_annotation(&self, draft: AnnotationDraft) -> Result<Annotation, AuditError> {
        // Tags form a set: a title repeated in the draft resolves once.
        let mut seen = HashSet::new();
        let mut tags = Vec::with_capacity(draft.tag_titles.len());
        for title in &draft.tag_titles {
            if !seen.insert(title.as_str()) {
                continue;
            }
            tags.push(self.tags.get_or_create(title, false).await?);
        }
        Ok(Annotation {
            title: draft.title,
            description: draft.description,
            highlight: draft.highlight,
            tags,
        })
    }

    fn entity_lock(&self, entity: &EntityRef) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .entity_locks
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        locks.entry(entity.clone()).or_default().clone()
    }
}
