use {
    super::annotation::Annotation,
    super::error::AuditError,
    super::id::{EmployeeId, SnapshotId},
    chrono::{DateTime, Utc},
    derive_more::Display,
    serde::{Deserialize, Serialize},
    std::fmt,
    uuid::Uuid,
};

/// Identity of a business object under audit: `(entity_type, entity_id)`.
/// The entity itself is owned by the host application; the engine only ever
/// sees read-only field maps for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{entity_type}/{entity_id}")]
pub struct EntityRef {
    pub entity_type: String,
    pub entity_id: Uuid,
}

impl EntityRef {
    pub fn new(entity_type: impl Into<String>, entity_id: Uuid) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for ChangeKind {
    type Error = AuditError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "deleted" => Ok(Self::Deleted),
            other => Err(AuditError::Validation(format!(
                "unknown change kind: {other}"
            ))),
        }
    }
}

/// A field pointing at another record. Compared by identity: the display
/// label is a denormalized caption and may drift when the target is renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub ref_type: String,
    pub ref_id: Uuid,
    pub display_label: String,
}

impl Reference {
    pub fn new(ref_type: impl Into<String>, ref_id: Uuid, display_label: impl Into<String>) -> Self {
        Self {
            ref_type: ref_type.into(),
            ref_id,
            display_label: display_label.into(),
        }
    }

    /// Identity equality — ignores `display_label`.
    pub fn same_target(&self, other: &Reference) -> bool {
        self.ref_type == other.ref_type && self.ref_id == other.ref_id
    }
}

/// Recorded value of one entity field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Reference(Reference),
    Empty,
}

impl FieldValue {
    /// Value equality under the diff policy: references match on
    /// `(ref_type, ref_id)`, every other variant on full equality.
    pub fn same_value(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (Self::Reference(a), Self::Reference(b)) => a.same_target(b),
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            Self::Reference(r) => write!(f, "{}", r.display_label),
            Self::Empty => Ok(()),
        }
    }
}

/// Ordered field map of a snapshot. Insertion order is the schema declaration
/// order supplied by the host and is preserved through diffing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet(Vec<(String, FieldValue)>);

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing in place if the name is already present so
    /// declaration order stays stable.
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (name, value) in iter {
            fields.set(name, value);
        }
        fields
    }
}

/// Who performed the mutation. Unresolvable editor identities degrade to the
/// system actor instead of failing the write path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Author {
    Employee(EmployeeId),
    System(String),
}

impl Author {
    pub fn bot() -> Self {
        Self::System("Bot".to_string())
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Employee(id) => write!(f, "employee:{id}"),
            Self::System(name) => write!(f, "system:{name}"),
        }
    }
}

/// Immutable full-field record of an entity at one point in time. Created
/// exactly once by the recorder; removed only by the deduplication pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    id: SnapshotId,
    entity: EntityRef,
    change_kind: ChangeKind,
    fields: FieldSet,
    author: Author,
    created_at: DateTime<Utc>,
    annotation: Option<Annotation>,
}

impl Snapshot {
    pub fn from_parts(
        id: SnapshotId,
        new: NewSnapshot,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            entity: new.entity,
            change_kind: new.change_kind,
            fields: new.fields,
            author: new.author,
            created_at,
            annotation: new.annotation,
        }
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn entity(&self) -> &EntityRef {
        &self.entity
    }

    pub fn change_kind(&self) -> ChangeKind {
        self.change_kind
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }
}

/// For append — the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewSnapshot {
    pub entity: EntityRef,
    pub change_kind: ChangeKind,
    pub fields: FieldSet,
    pub author: Author,
    pub annotation: Option<Annotation>,
}
