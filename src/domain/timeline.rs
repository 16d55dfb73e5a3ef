use {
    super::annotation::Annotation,
    super::id::SnapshotId,
    super::snapshot::Author,
    chrono::{DateTime, Utc},
    serde::Serialize,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Created,
    Changes,
}

/// One field difference rendered for display: resolved label, reference
/// marker, and stringified old/new values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub field_name: String,
    pub field_label: String,
    pub is_reference: bool,
    pub old_value: String,
    pub new_value: String,
}

/// One row of the assembled timeline. Derived on read, never persisted.
///
/// A `Created` entry carries no diffs and no `previous_id`; a `Changes`
/// entry describes the delta from `previous_id` to `snapshot_id` and is
/// attributed to the author of the newer snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeEntry {
    pub kind: EntryKind,
    pub snapshot_id: SnapshotId,
    pub previous_id: Option<SnapshotId>,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub annotation: Option<Annotation>,
    pub diffs: Vec<FieldDiff>,
}
