use {super::id::EmployeeId, uuid::Uuid};

/// How a field is compared and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    Reference,
}

/// Schema lookup supplied by the host's model layer. The engine does not
/// decide what counts as a trackable entity or field; it only asks.
pub trait SchemaProvider: Send + Sync {
    /// Human-readable label for a field; `None` falls back to the raw
    /// field name in the timeline.
    fn field_label(&self, entity_type: &str, field_name: &str) -> Option<String>;

    fn field_kind(&self, entity_type: &str, field_name: &str) -> FieldKind;
}

/// Maps an opaque editor identity onto a known employee. Unknown identities
/// return `None` and the recorder degrades to the system actor.
pub trait EmployeeDirectory: Send + Sync {
    fn resolve_employee(&self, editor: &str) -> Option<EmployeeId>;
}

/// Liveness lookup for reference targets, so historical diffs can render
/// even after the referenced record is gone.
pub trait ReferenceResolver: Send + Sync {
    /// Current display label of the target, or `None` if it has been
    /// deleted since the snapshot was taken.
    fn resolve(&self, ref_type: &str, ref_id: Uuid) -> Option<String>;
}
