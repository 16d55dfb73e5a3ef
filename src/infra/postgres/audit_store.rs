use {
    crate::domain::annotation::{Annotation, Tag},
    crate::domain::error::AuditError,
    crate::domain::id::SnapshotId,
    crate::domain::snapshot::{Author, ChangeKind, EntityRef, FieldSet, NewSnapshot, Snapshot},
    crate::domain::store::{SnapshotStore, TagStore},
    chrono::{DateTime, Utc},
    sqlx::PgPool,
    std::{future::Future, pin::Pin},
    uuid::Uuid,
};

/// Postgres-backed snapshot log and tag set.
///
/// Appends take a `pg_advisory_xact_lock` keyed on the entity, so id
/// assignment for one entity is serialized even across processes. The
/// `tags.title` UNIQUE constraint backs get-or-create.
#[derive(Clone)]
pub struct PgAuditStore {
    pool: PgPool,
}

impl PgAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type SnapshotRow = (
    i64,
    String,
    serde_json::Value,
    serde_json::Value,
    Option<serde_json::Value>,
    DateTime<Utc>,
);

fn snapshot_from_row(entity: &EntityRef, row: SnapshotRow) -> Result<Snapshot, AuditError> {
    let (id, change_kind, fields, author, annotation, created_at) = row;
    let new = NewSnapshot {
        entity: entity.clone(),
        change_kind: ChangeKind::try_from(change_kind.as_str())?,
        fields: serde_json::from_value::<FieldSet>(fields)?,
        author: serde_json::from_value::<Author>(author)?,
        annotation: annotation
            .map(serde_json::from_value::<Annotation>)
            .transpose()?,
    };
    Ok(Snapshot::from_parts(SnapshotId::new(id), new, created_at))
}

impl SnapshotStore for PgAuditStore {
    fn append(
        &self,
        snapshot: NewSnapshot,
    ) -> Pin<Box<dyn Future<Output = Result<Snapshot, AuditError>> + Send + '_>> {
        Box::pin(async move {
            let fields = serde_json::to_value(&snapshot.fields)?;
            let author = serde_json::to_value(&snapshot.author)?;
            let annotation = snapshot
                .annotation
                .as_ref()
                .map(serde_json::to_value)
                .transpose()?;

            let mut tx = self.pool.begin().await?;

            // Serialize appends per entity.
            sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
                .bind(snapshot.entity.to_string())
                .execute(&mut *tx)
                .await?;

            let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
                r#"
                INSERT INTO snapshots (entity_type, entity_id, change_kind, fields, author, annotation)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, created_at
                "#,
            )
            .bind(&snapshot.entity.entity_type)
            .bind(snapshot.entity.entity_id)
            .bind(snapshot.change_kind.as_str())
            .bind(fields)
            .bind(author)
            .bind(annotation)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;

            Ok(Snapshot::from_parts(
                SnapshotId::new(id),
                snapshot,
                created_at,
            ))
        })
    }

    fn list_by_entity(
        &self,
        entity: &EntityRef,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Snapshot>, AuditError>> + Send + '_>> {
        let entity = entity.clone();
        Box::pin(async move {
            let rows: Vec<SnapshotRow> = sqlx::query_as(
                r#"
                SELECT id, change_kind, fields, author, annotation, created_at
                FROM snapshots
                WHERE entity_type = $1 AND entity_id = $2
                ORDER BY id DESC
                "#,
            )
            .bind(&entity.entity_type)
            .bind(entity.entity_id)
            .fetch_all(&self.pool)
            .await?;

            rows.into_iter()
                .map(|row| snapshot_from_row(&entity, row))
                .collect()
        })
    }

    fn delete_snapshot(
        &self,
        entity: &EntityRef,
        id: SnapshotId,
    ) -> Pin<Box<dyn Future<Output = Result<(), AuditError>> + Send + '_>> {
        let entity = entity.clone();
        Box::pin(async move {
            sqlx::query(
                "DELETE FROM snapshots WHERE entity_type = $1 AND entity_id = $2 AND id = $3",
            )
            .bind(&entity.entity_type)
            .bind(entity.entity_id)
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
            Ok(())
        })
    }
}

impl TagStore for PgAuditStore {
    fn get_or_create(
        &self,
        title: &str,
        highlight: bool,
    ) -> Pin<Box<dyn Future<Output = Result<Tag, AuditError>> + Send + '_>> {
        let title = title.to_string();
        Box::pin(async move {
            let mut tx = self.pool.begin().await?;

            // UNIQUE(title) makes the insert race-safe; the loser of a
            // concurrent create simply reads the winner's row back.
            sqlx::query(
                r#"
                INSERT INTO tags (id, title, highlight)
                VALUES ($1, $2, $3)
                ON CONFLICT (title) DO NOTHING
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(&title)
            .bind(highlight)
            .execute(&mut *tx)
            .await?;

            let (id, title, highlight): (Uuid, String, bool) =
                sqlx::query_as("SELECT id, title, highlight FROM tags WHERE title = $1")
                    .bind(&title)
                    .fetch_one(&mut *tx)
                    .await?;

            tx.commit().await?;

            Ok(Tag {
                id,
                title,
                highlight,
            })
        })
    }
}
