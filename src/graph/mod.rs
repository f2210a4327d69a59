//! Knowledge graph module: static lookup tables and input-file loading.
//!
//! Holds course metadata, concept names, course→concept membership, and
//! inverted concept-prerequisite edges parsed from the MOOCCube-style
//! entity/relation dumps.

mod loader;
mod store;

pub use loader::{clean_description, load_graph, verify_inputs, LoadStats};
pub use loader::{
    CONCEPT_ENTITIES, COURSE_CONCEPT_RELATIONS, COURSE_ENTITIES, PREREQUISITE_RELATIONS,
    USER_COURSE_RELATIONS,
};
pub use store::{CourseInfo, GraphStore};
