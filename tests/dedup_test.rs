mod common;

use common::*;
use hr_audit::domain::snapshot::{Author, ChangeKind, EntityRef, FieldSet, NewSnapshot};
use hr_audit::domain::store::SnapshotStore;
use hr_audit::infra::memory::MemoryStore;
use hr_audit::services::dedup::collapse_noops;
use uuid::Uuid;

fn new_snapshot(entity: &EntityRef, kind: ChangeKind, fields: FieldSet) -> NewSnapshot {
    NewSnapshot {
        entity: entity.clone(),
        change_kind: kind,
        fields,
        author: Author::bot(),
        annotation: None,
    }
}

async fn seed(store: &MemoryStore, entity: &EntityRef, names: &[&str]) {
    for (i, name) in names.iter().enumerate() {
        let kind = if i == 0 {
            ChangeKind::Created
        } else {
            ChangeKind::Updated
        };
        store
            .append(new_snapshot(
                entity,
                kind,
                employee_fields(name, SALES_DEPT, "Sales"),
            ))
            .await
            .unwrap();
    }
}

// ── chain collapse ─────────────────────────────────────────────────────────

#[tokio::test]
async fn chain_of_noops_collapses_fully() {
    let store = MemoryStore::new();
    let entity = employee_entity();
    seed(&store, &entity, &["Alice", "Alice", "Alice", "Alice"]).await;

    let removed = collapse_noops(&store, &entity).await.unwrap();
    assert_eq!(removed, 3);

    let log = store.list_by_entity(&entity).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].change_kind(), ChangeKind::Created);
}

#[tokio::test]
async fn noop_run_collapses_into_first_change() {
    let store = MemoryStore::new();
    let entity = employee_entity();
    // Created(Alice), then three identical Bob updates: the run collapses
    // into the oldest Bob, which still differs from Alice.
    seed(&store, &entity, &["Alice", "Bob", "Bob", "Bob"]).await;
    let log = store.list_by_entity(&entity).await.unwrap();
    let first_bob_id = log[2].id();

    let removed = collapse_noops(&store, &entity).await.unwrap();
    assert_eq!(removed, 2);

    let log = store.list_by_entity(&entity).await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].id(), first_bob_id);
    assert_eq!(log[1].change_kind(), ChangeKind::Created);
}

// ── idempotence ────────────────────────────────────────────────────────────

#[tokio::test]
async fn dedup_is_idempotent() {
    let store = MemoryStore::new();
    let entity = employee_entity();
    seed(&store, &entity, &["Alice", "Alice", "Bob", "Bob", "Alice"]).await;

    collapse_noops(&store, &entity).await.unwrap();
    let after_first: Vec<_> = store
        .list_by_entity(&entity)
        .await
        .unwrap()
        .iter()
        .map(|s| s.id())
        .collect();

    let removed = collapse_noops(&store, &entity).await.unwrap();
    assert_eq!(removed, 0);

    let after_second: Vec<_> = store
        .list_by_entity(&entity)
        .await
        .unwrap()
        .iter()
        .map(|s| s.id())
        .collect();
    assert_eq!(after_first, after_second);
}

// ── created snapshot survives any input ────────────────────────────────────

#[tokio::test]
async fn created_snapshot_never_deleted() {
    let store = MemoryStore::new();
    let entity = employee_entity();
    seed(&store, &entity, &["Alice"]).await;

    let removed = collapse_noops(&store, &entity).await.unwrap();
    assert_eq!(removed, 0);
    assert_eq!(store.list_by_entity(&entity).await.unwrap().len(), 1);
}

// ── alternating values never collapse ──────────────────────────────────────

#[tokio::test]
async fn alternating_values_are_preserved() {
    let store = MemoryStore::new();
    let entity = employee_entity();
    seed(&store, &entity, &["Alice", "Bob", "Alice"]).await;

    let removed = collapse_noops(&store, &entity).await.unwrap();
    assert_eq!(removed, 0);
    assert_eq!(store.list_by_entity(&entity).await.unwrap().len(), 3);
}

// ── surviving order is never shuffled ──────────────────────────────────────

#[tokio::test]
async fn survivors_keep_log_order() {
    let store = MemoryStore::new();
    let entity = employee_entity();
    seed(
        &store,
        &entity,
        &["Alice", "Alice", "Bob", "Carol", "Carol", "Dave"],
    )
    .await;

    collapse_noops(&store, &entity).await.unwrap();

    let log = store.list_by_entity(&entity).await.unwrap();
    let ids: Vec<i64> = log.iter().map(|s| s.id().as_i64()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted, "log must stay newest-first after collapse");
    assert_eq!(log.len(), 4);
}

// ── dedup is scoped to one entity ──────────────────────────────────────────

#[tokio::test]
async fn dedup_does_not_touch_other_entities() {
    let store = MemoryStore::new();
    let a = employee_entity();
    let b = EntityRef::new("employee", Uuid::from_u128(200));
    seed(&store, &a, &["Alice", "Alice"]).await;
    seed(&store, &b, &["Bob", "Bob"]).await;

    collapse_noops(&store, &a).await.unwrap();

    assert_eq!(store.list_by_entity(&a).await.unwrap().len(), 1);
    assert_eq!(store.list_by_entity(&b).await.unwrap().len(), 2);
}
