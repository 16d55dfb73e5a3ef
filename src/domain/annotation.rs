use {
    serde::{Deserialize, Serialize},
    uuid::Uuid,
};

/// Audit label shared across entities. Deduplicated by title: get-or-create
/// returns the existing tag rather than minting a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub title: String,
    pub highlight: bool,
}

/// User-supplied audit context attached to a snapshot at capture time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub title: Option<String>,
    pub description: Option<String>,
    pub highlight: bool,
    pub tags: Vec<Tag>,
}

/// Raw annotation input from the caller, before tag titles are resolved
/// against the shared tag set.
#[derive(Debug, Clone, Default)]
pub struct AnnotationDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub highlight: bool,
    pub tag_titles: Vec<String>,
}
