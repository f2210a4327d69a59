//! Justification wording. Templates match the training corpus exactly so
//! the downstream fine-tuned agent reproduces the same three-way style.

use crate::error::Result;
use crate::graph::GraphStore;
use crate::reason::{decide, Justification};

/// Placeholder names for concepts referenced by edges but missing from the
/// concept metadata.
const FALLBACK_PREREQUISITE: &str = "基础知识";
const FALLBACK_TARGET: &str = "进阶知识";
const FALLBACK_SHARED: &str = "相关知识";

/// Render a justification as a single line, led by its strategy marker.
pub fn render(graph: &GraphStore, justification: &Justification) -> String {
    match justification {
        Justification::Prerequisite { satisfied, concept } => {
            let pre_name = graph.concept_name_or(satisfied, FALLBACK_PREREQUISITE);
            let target_name = graph.concept_name_or(concept, FALLBACK_TARGET);
            format!(
                "**逻辑连贯**：你在之前的课程中已经接触了“{pre_name}”，这正是本课程核心概念“{target_name}”的先修基础，学习路径非常顺畅。"
            )
        }
        Justification::Continuation { concept } => {
            let name = graph.concept_name_or(concept, FALLBACK_SHARED);
            format!(
                "**兴趣延续**：该课程继续深入探讨了你感兴趣的“{name}”领域，有助于巩固你的知识体系。"
            )
        }
        Justification::Description { desc } => {
            format!("**内容推荐**：该课程主要讲解：{desc}。")
        }
    }
}

/// Decide and render in one step.
pub fn generate_reason(graph: &GraphStore, history: &[String], target: &str) -> Result<String> {
    let justification = decide(graph, history, target)?;
    Ok(render(graph, &justification))
}
