//! Line-delimited parsing of the MOOCCube entity and relation dumps.
//!
//! Entity files are JSON-per-line; relation files are two-or-more fields
//! separated by a tab when one is present, otherwise by arbitrary
//! whitespace. Malformed lines are skipped and only counted in aggregate.

use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{MoocgenError, Result};
use crate::graph::GraphStore;

/// Course entity dump (optional).
pub const COURSE_ENTITIES: &str = "course.json";
/// Concept entity dump (optional).
pub const CONCEPT_ENTITIES: &str = "concept.json";
/// Course → concept membership dump (required).
pub const COURSE_CONCEPT_RELATIONS: &str = "course-concept.json";
/// Concept prerequisite dump, `prerequisite \t dependent` (required).
pub const PREREQUISITE_RELATIONS: &str = "prerequisite-dependency.json";
/// Enrollment dump, `user \t course [\t time...]` (required).
pub const USER_COURSE_RELATIONS: &str = "user-course.json";

/// Aggregate counters from a graph load.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadStats {
    pub courses: usize,
    pub concepts: usize,
    pub course_concept_edges: usize,
    pub prerequisite_edges: usize,
    /// Lines skipped across all inputs (malformed JSON, too few fields).
    pub skipped_lines: usize,
}

#[derive(Debug, Deserialize)]
struct CourseRecord {
    id: String,
    name: String,
    #[serde(default)]
    about: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConceptRecord {
    id: String,
    name: String,
}

/// Check that the required relation files exist before any parsing starts.
///
/// Entity files are optional (missing metadata degrades to placeholder
/// names); the three relation files are not.
pub fn verify_inputs(relations_dir: &Path) -> Result<()> {
    for name in [
        COURSE_CONCEPT_RELATIONS,
        PREREQUISITE_RELATIONS,
        USER_COURSE_RELATIONS,
    ] {
        let path = relations_dir.join(name);
        if !path.is_file() {
            return Err(MoocgenError::MissingInput(path.display().to_string()));
        }
    }
    Ok(())
}

/// Strip known HTML artifacts and truncate to `max_chars` display
/// characters (not bytes — descriptions are mostly CJK text).
pub fn clean_description(raw: &str, max_chars: usize) -> String {
    let stripped = raw
        .replace("<p>", "")
        .replace("</p>", "")
        .replace("&nbsp;", " ");
    stripped.chars().take(max_chars).collect()
}

/// Split a relation line into fields: tab-separated when a tab is present,
/// whitespace-separated otherwise.
fn split_fields(line: &str) -> Vec<&str> {
    let line = line.trim();
    if line.contains('\t') {
        line.split('\t').collect()
    } else {
        line.split_whitespace().collect()
    }
}

/// Load the knowledge graph from the entity and relation dumps.
///
/// Constructs a fresh [`GraphStore`] on every call, so repeated loads of
/// the same files produce identical contents.
pub fn load_graph(
    entities_dir: &Path,
    relations_dir: &Path,
    desc_max_chars: usize,
) -> Result<(GraphStore, LoadStats)> {
    verify_inputs(relations_dir)?;

    let mut store = GraphStore::new();
    let mut stats = LoadStats::default();

    load_courses(&entities_dir.join(COURSE_ENTITIES), desc_max_chars, &mut store, &mut stats)?;
    load_concepts(&entities_dir.join(CONCEPT_ENTITIES), &mut store, &mut stats)?;
    load_course_concepts(&relations_dir.join(COURSE_CONCEPT_RELATIONS), &mut store, &mut stats)?;
    load_prerequisites(&relations_dir.join(PREREQUISITE_RELATIONS), &mut store, &mut stats)?;

    stats.courses = store.course_count();
    stats.concepts = store.concept_count();
    stats.course_concept_edges = store.course_concept_edge_count();
    stats.prerequisite_edges = store.prerequisite_edge_count();

    log::info!(
        "Graph loaded: {} courses, {} concepts, {} course-concept edges, {} prerequisite edges ({} lines skipped)",
        stats.courses,
        stats.concepts,
        stats.course_concept_edges,
        stats.prerequisite_edges,
        stats.skipped_lines,
    );

    Ok((store, stats))
}

fn load_courses(
    path: &Path,
    desc_max_chars: usize,
    store: &mut GraphStore,
    stats: &mut LoadStats,
) -> Result<()> {
    let Some(reader) = open_optional(path)? else {
        log::warn!("Course metadata not found at {}; proceeding without course names", path.display());
        return Ok(());
    };
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<CourseRecord>(&line) {
            Ok(rec) => {
                let raw_desc = match rec.about.as_deref() {
                    Some(about) if !about.is_empty() => about,
                    _ => rec.name.as_str(),
                };
                let desc = clean_description(raw_desc, desc_max_chars);
                store.insert_course(rec.id, rec.name, desc);
            }
            Err(_) => stats.skipped_lines += 1,
        }
    }
    Ok(())
}

fn load_concepts(path: &Path, store: &mut GraphStore, stats: &mut LoadStats) -> Result<()> {
    let Some(reader) = open_optional(path)? else {
        log::warn!("Concept metadata not found at {}; proceeding without concept names", path.display());
        return Ok(());
    };
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ConceptRecord>(&line) {
            Ok(rec) => store.insert_concept(rec.id, rec.name),
            Err(_) => stats.skipped_lines += 1,
        }
    }
    Ok(())
}

fn load_course_concepts(path: &Path, store: &mut GraphStore, stats: &mut LoadStats) -> Result<()> {
    let reader = BufReader::new(File::open(path)?);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_fields(&line);
        if fields.len() >= 2 {
            store.add_course_concept(fields[0], fields[1]);
        } else {
            stats.skipped_lines += 1;
        }
    }
    Ok(())
}

fn load_prerequisites(path: &Path, store: &mut GraphStore, stats: &mut LoadStats) -> Result<()> {
    let reader = BufReader::new(File::open(path)?);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_fields(&line);
        if fields.len() >= 2 {
            // fields[0] is a prerequisite of fields[1]
            store.add_prerequisite(fields[0], fields[1]);
        } else {
            stats.skipped_lines += 1;
        }
    }
    Ok(())
}

/// Open an optional input file: `None` when absent, error on any other
/// I/O failure.
fn open_optional(path: &Path) -> Result<Option<BufReader<File>>> {
    match File::open(path) {
        Ok(f) => Ok(Some(BufReader::new(f))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
