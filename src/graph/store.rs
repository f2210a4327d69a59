use std::collections::{BTreeSet, HashMap};

use crate::error::{MoocgenError, Result};

/// Display metadata for a single course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseInfo {
    pub name: String,
    /// HTML-stripped, truncated course description (see
    /// [`clean_description`](crate::graph::clean_description)).
    pub desc: String,
}

/// In-memory lookup tables over the educational knowledge graph.
///
/// Built once at startup and read-only afterwards. All lookups are total:
/// unknown ids yield empty collections or caller-supplied fallbacks, except
/// [`course_info`](GraphStore::course_info) which errors so callers guard
/// with [`contains_course`](GraphStore::contains_course) first.
#[derive(Debug, Default)]
pub struct GraphStore {
    courses: HashMap<String, CourseInfo>,
    concept_names: HashMap<String, String>,
    /// Course id → concept ids, insertion order preserved ("first listed"
    /// is the tie-break order for justification choices).
    course_concepts: HashMap<String, Vec<String>>,
    /// Inverted prerequisite edges: dependent concept → its prerequisites.
    /// Ordered set so "pick one" choices are deterministic
    /// (lexicographically smallest id).
    prerequisites: HashMap<String, BTreeSet<String>>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_course(&mut self, id: impl Into<String>, name: impl Into<String>, desc: impl Into<String>) {
        self.courses.insert(
            id.into(),
            CourseInfo {
                name: name.into(),
                desc: desc.into(),
            },
        );
    }

    pub fn insert_concept(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.concept_names.insert(id.into(), name.into());
    }

    pub fn add_course_concept(&mut self, course_id: impl Into<String>, concept_id: impl Into<String>) {
        self.course_concepts
            .entry(course_id.into())
            .or_default()
            .push(concept_id.into());
    }

    /// Record that `prerequisite_id` must be understood before `dependent_id`.
    pub fn add_prerequisite(&mut self, prerequisite_id: impl Into<String>, dependent_id: impl Into<String>) {
        self.prerequisites
            .entry(dependent_id.into())
            .or_default()
            .insert(prerequisite_id.into());
    }

    /// Metadata for a course, or `CourseNotFound` if it was never loaded.
    pub fn course_info(&self, id: &str) -> Result<&CourseInfo> {
        self.courses
            .get(id)
            .ok_or_else(|| MoocgenError::CourseNotFound(id.to_string()))
    }

    pub fn contains_course(&self, id: &str) -> bool {
        self.courses.contains_key(id)
    }

    /// Concept display name, or the caller-supplied placeholder when the
    /// concept was referenced by an edge but never seen in metadata.
    pub fn concept_name_or<'a>(&'a self, id: &str, fallback: &'a str) -> &'a str {
        self.concept_names.get(id).map(String::as_str).unwrap_or(fallback)
    }

    /// Concept ids covered by a course, in file order. Empty for unknown
    /// courses.
    pub fn course_concepts(&self, course_id: &str) -> &[String] {
        self.course_concepts
            .get(course_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Prerequisite concepts of `concept_id`. `None` means no recorded
    /// prerequisites.
    pub fn prerequisites_of(&self, concept_id: &str) -> Option<&BTreeSet<String>> {
        self.prerequisites.get(concept_id)
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    pub fn concept_count(&self) -> usize {
        self.concept_names.len()
    }

    pub fn course_concept_edge_count(&self) -> usize {
        self.course_concepts.values().map(Vec::len).sum()
    }

    pub fn prerequisite_edge_count(&self) -> usize {
        self.prerequisites.values().map(BTreeSet::len).sum()
    }
}
