//! Enrollment aggregation: user-course records → per-learner course
//! sequences.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;
use crate::graph::GraphStore;

/// One learner's enrollments, in original file order. Duplicates are kept
/// (re-enrollment in the same course is a real event).
#[derive(Debug, Clone)]
pub struct LearnerHistory {
    pub learner_id: String,
    pub courses: Vec<String>,
}

/// Aggregate counters from history aggregation.
#[derive(Debug, Default, Clone, Copy)]
pub struct HistoryStats {
    /// Enrollment records read.
    pub records: usize,
    /// Records kept (course known to the graph).
    pub kept: usize,
    /// Records dropped because the course has no metadata entry.
    pub dropped_unknown_course: usize,
    /// Lines with fewer than two fields.
    pub malformed_lines: usize,
}

/// Group enrollment records into per-learner ordered course sequences.
///
/// Each record's first two fields are learner id and course id; trailing
/// fields (timestamps) are ignored. Courses absent from the metadata table
/// are dropped silently, counted only in aggregate. Learners appear in the
/// returned vector in first-seen input order, so the result is
/// deterministic for a given input file.
pub fn aggregate<R: BufRead>(reader: R, graph: &GraphStore) -> Result<(Vec<LearnerHistory>, HistoryStats)> {
    let mut histories: Vec<LearnerHistory> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut stats = HistoryStats::default();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = if line.contains('\t') {
            line.split('\t').collect()
        } else {
            line.split_whitespace().collect()
        };
        if fields.len() < 2 {
            stats.malformed_lines += 1;
            continue;
        }
        stats.records += 1;
        let (learner_id, course_id) = (fields[0], fields[1]);

        if !graph.contains_course(course_id) {
            stats.dropped_unknown_course += 1;
            continue;
        }
        stats.kept += 1;

        let slot = *index.entry(learner_id.to_string()).or_insert_with(|| {
            histories.push(LearnerHistory {
                learner_id: learner_id.to_string(),
                courses: Vec::new(),
            });
            histories.len() - 1
        });
        histories[slot].courses.push(course_id.to_string());
    }

    log::info!(
        "Aggregated {} learners from {} records ({} dropped for unknown courses, {} malformed lines)",
        histories.len(),
        stats.records,
        stats.dropped_unknown_course,
        stats.malformed_lines,
    );

    Ok((histories, stats))
}

/// Aggregate straight from the enrollment dump on disk.
pub fn load_histories(path: &Path, graph: &GraphStore) -> Result<(Vec<LearnerHistory>, HistoryStats)> {
    let reader = BufReader::new(File::open(path)?);
    aggregate(reader, graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_courses(ids: &[&str]) -> GraphStore {
        let mut store = GraphStore::new();
        for id in ids {
            store.insert_course(*id, format!("{id} name"), format!("{id} desc"));
        }
        store
    }

    #[test]
    fn test_aggregate_groups_in_order() {
        let graph = graph_with_courses(&["C_1", "C_2", "C_3"]);
        let input = "U_1\tC_1\t2019-01-01\nU_2\tC_3\nU_1\tC_2\n";

        let (histories, stats) = aggregate(input.as_bytes(), &graph).unwrap();

        assert_eq!(histories.len(), 2);
        assert_eq!(histories[0].learner_id, "U_1");
        assert_eq!(histories[0].courses, ["C_1", "C_2"]);
        assert_eq!(histories[1].learner_id, "U_2");
        assert_eq!(histories[1].courses, ["C_3"]);
        assert_eq!(stats.kept, 3);
    }

    #[test]
    fn test_aggregate_drops_unknown_courses() {
        let graph = graph_with_courses(&["C_1"]);
        let input = "U_1\tC_1\nU_1\tC_unknown\nU_1\tC_1\n";

        let (histories, stats) = aggregate(input.as_bytes(), &graph).unwrap();

        // Unknown course dropped, duplicate enrollment kept
        assert_eq!(histories[0].courses, ["C_1", "C_1"]);
        assert_eq!(stats.dropped_unknown_course, 1);
        assert_eq!(stats.kept, 2);
    }

    #[test]
    fn test_aggregate_skips_malformed_lines() {
        let graph = graph_with_courses(&["C_1"]);
        let input = "U_1\tC_1\njust-one-field\n\nU_1 C_1\n";

        let (histories, stats) = aggregate(input.as_bytes(), &graph).unwrap();

        assert_eq!(histories[0].courses, ["C_1", "C_1"]);
        assert_eq!(stats.malformed_lines, 1);
    }
}
