#![allow(dead_code)]

use hr_audit::domain::annotation::AnnotationDraft;
use hr_audit::domain::id::EmployeeId;
use hr_audit::domain::provider::{EmployeeDirectory, FieldKind, ReferenceResolver, SchemaProvider};
use hr_audit::domain::snapshot::{ChangeKind, EntityRef, FieldSet, FieldValue, Reference};
use hr_audit::infra::memory::MemoryStore;
use hr_audit::services::recorder::{AuditTrail, MutationRecord};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const SALES_DEPT: Uuid = Uuid::from_u128(12);
pub const MARKETING_DEPT: Uuid = Uuid::from_u128(13);

pub fn alice_id() -> EmployeeId {
    EmployeeId::new(Uuid::from_u128(1))
}

/// Map-backed schema for the "employee" entity: `name` is a scalar labelled
/// "Full name", `dept` is a reference labelled "Department".
pub struct StaticSchema {
    labels: HashMap<&'static str, &'static str>,
    reference_fields: HashSet<&'static str>,
}

impl StaticSchema {
    pub fn employee() -> Self {
        Self {
            labels: HashMap::from([("name", "Full name"), ("dept", "Department")]),
            reference_fields: HashSet::from(["dept"]),
        }
    }
}

impl SchemaProvider for StaticSchema {
    fn field_label(&self, _entity_type: &str, field_name: &str) -> Option<String> {
        self.labels.get(field_name).map(|l| l.to_string())
    }

    fn field_kind(&self, _entity_type: &str, field_name: &str) -> FieldKind {
        if self.reference_fields.contains(field_name) {
            FieldKind::Reference
        } else {
            FieldKind::Scalar
        }
    }
}

/// Directory that knows a single editor principal, "alice@corp".
pub struct StaticDirectory;

impl EmployeeDirectory for StaticDirectory {
    fn resolve_employee(&self, editor: &str) -> Option<EmployeeId> {
        (editor == "alice@corp").then(alice_id)
    }
}

/// Mutable registry of live reference targets, so tests can delete a
/// referenced record after history mentions it.
#[derive(Default)]
pub struct LiveRefs {
    targets: Mutex<HashMap<(String, Uuid), String>>,
}

impl LiveRefs {
    pub fn with_departments() -> Self {
        let refs = Self::default();
        refs.insert("department", SALES_DEPT, "Sales");
        refs.insert("department", MARKETING_DEPT, "Marketing");
        refs
    }

    pub fn insert(&self, ref_type: &str, ref_id: Uuid, label: &str) {
        self.targets
            .lock()
            .unwrap()
            .insert((ref_type.to_string(), ref_id), label.to_string());
    }

    pub fn delete(&self, ref_type: &str, ref_id: Uuid) {
        self.targets
            .lock()
            .unwrap()
            .remove(&(ref_type.to_string(), ref_id));
    }
}

impl ReferenceResolver for LiveRefs {
    fn resolve(&self, ref_type: &str, ref_id: Uuid) -> Option<String> {
        self.targets
            .lock()
            .unwrap()
            .get(&(ref_type.to_string(), ref_id))
            .cloned()
    }
}

pub struct TestTrail {
    pub trail: Arc<AuditTrail>,
    pub store: Arc<MemoryStore>,
    pub refs: Arc<LiveRefs>,
}

/// Routes engine tracing (e.g. the dedup-failure warn path) through the
/// test writer. First caller wins; later inits are no-ops.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn build_trail() -> TestTrail {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let refs = Arc::new(LiveRefs::with_departments());
    let trail = Arc::new(AuditTrail::new(
        store.clone(),
        store.clone(),
        Arc::new(StaticDirectory),
        Arc::new(StaticSchema::employee()),
        refs.clone(),
    ));
    TestTrail { trail, store, refs }
}

pub fn employee_entity() -> EntityRef {
    EntityRef::new("employee", Uuid::from_u128(100))
}

/// `{name, dept}` field set in schema declaration order.
pub fn employee_fields(name: &str, dept_id: Uuid, dept_label: &str) -> FieldSet {
    let mut fields = FieldSet::new();
    fields.set("name", FieldValue::Text(name.to_string()));
    fields.set(
        "dept",
        FieldValue::Reference(Reference::new("department", dept_id, dept_label)),
    );
    fields
}

pub fn mutation(
    entity: &EntityRef,
    change_kind: ChangeKind,
    fields: FieldSet,
    editor: Option<&str>,
) -> MutationRecord {
    MutationRecord {
        entity: entity.clone(),
        change_kind,
        fields,
        editor: editor.map(|e| e.to_string()),
        annotation: None,
    }
}

pub fn annotated(mut record: MutationRecord, draft: AnnotationDraft) -> MutationRecord {
    record.annotation = Some(draft);
    record
}
