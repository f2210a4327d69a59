use std::collections::HashSet;

use crate::error::Result;
use crate::graph::GraphStore;

/// Why a target course is a reasonable next step. Exactly one variant per
/// recommendation; variants carry ids (or the stored description), names
/// are resolved at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Justification {
    /// A concept of the target course has a prerequisite the learner
    /// already covered.
    Prerequisite {
        /// The satisfied prerequisite concept (from history).
        satisfied: String,
        /// The target-course concept it unlocks.
        concept: String,
    },
    /// The target course shares a concept with the learner's history.
    Continuation { concept: String },
    /// No graph relation found; fall back to the course description.
    Description { desc: String },
}

impl Justification {
    /// Marker label identifying the strategy in rendered output.
    pub fn label(&self) -> &'static str {
        match self {
            Justification::Prerequisite { .. } => "逻辑连贯",
            Justification::Continuation { .. } => "兴趣延续",
            Justification::Description { .. } => "内容推荐",
        }
    }
}

/// Choose a justification for recommending `target` after `history`.
///
/// Strategies are evaluated in strict priority order:
///
/// 1. Scan the target's concepts in stored (file) order; at each concept
///    with recorded prerequisites, intersect those prerequisites with the
///    union of all history concepts. The first non-empty intersection wins;
///    within it the lexicographically smallest prerequisite id is chosen
///    (prerequisite sets are ordered).
/// 2. Otherwise the first target concept (stored order) that also appears
///    in the history concepts wins.
/// 3. Otherwise the target's stored description.
///
/// Fails only when `target` has no metadata entry, which callers rule out
/// by construction (histories are pre-filtered to known courses).
pub fn decide(graph: &GraphStore, history: &[String], target: &str) -> Result<Justification> {
    let target_concepts = graph.course_concepts(target);

    let history_concepts: HashSet<&str> = history
        .iter()
        .flat_map(|course| graph.course_concepts(course))
        .map(String::as_str)
        .collect();

    // Strategy 1: prerequisite satisfaction
    for tc in target_concepts {
        if let Some(prereqs) = graph.prerequisites_of(tc) {
            if let Some(satisfied) = prereqs
                .iter()
                .find(|p| history_concepts.contains(p.as_str()))
            {
                return Ok(Justification::Prerequisite {
                    satisfied: satisfied.clone(),
                    concept: tc.clone(),
                });
            }
        }
    }

    // Strategy 2: topical continuation
    if let Some(shared) = target_concepts
        .iter()
        .find(|tc| history_concepts.contains(tc.as_str()))
    {
        return Ok(Justification::Continuation {
            concept: shared.clone(),
        });
    }

    // Strategy 3: description fallback
    let info = graph.course_info(target)?;
    Ok(Justification::Description {
        desc: info.desc.clone(),
    })
}
