//! Example assembly: slides a window over each learner's sequence and
//! renders (history, target) pairs into ShareGPT-format dialogue examples.

use serde::{Deserialize, Serialize};

use crate::config::WindowingConfig;
use crate::error::Result;
use crate::graph::GraphStore;
use crate::history::LearnerHistory;
use crate::reason::generate_reason;

/// Fixed system instruction carried by every example.
pub const SYSTEM_PROMPT: &str = "你是一个精通认知规律的AI教育顾问。请基于学习者的历史课程，推荐下一门课程，并从知识图谱的角度解释推荐理由（如先修关系、概念延续等）。";

/// Message role, serialized lowercase into the ShareGPT `from` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message (`{"from": ..., "value": ...}` on the wire).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "from")]
    pub role: Role,
    pub value: String,
}

/// One training record: system instruction, synthesized user query,
/// synthesized assistant response with embedded justification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueExample {
    pub conversations: Vec<Message>,
}

impl DialogueExample {
    fn new(user: String, assistant: String) -> Self {
        DialogueExample {
            conversations: vec![
                Message {
                    role: Role::System,
                    value: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: Role::User,
                    value: user,
                },
                Message {
                    role: Role::Assistant,
                    value: assistant,
                },
            ],
        }
    }
}

/// Builds dialogue examples from learner histories.
pub struct ExampleBuilder<'a> {
    graph: &'a GraphStore,
    windowing: WindowingConfig,
    emitted: usize,
}

impl<'a> ExampleBuilder<'a> {
    pub fn new(graph: &'a GraphStore, windowing: WindowingConfig) -> Self {
        ExampleBuilder {
            graph,
            windowing,
            emitted: 0,
        }
    }

    /// Examples emitted so far, for progress reporting.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Build the examples for one learner.
    ///
    /// Histories shorter than `min_history_len` produce nothing. Only the
    /// last `max_targets_per_learner` positions become targets; each
    /// target's context is the up-to-`context_len` courses immediately
    /// preceding it. Empty context windows are skipped, so the reason
    /// generator never sees an empty history.
    pub fn build_for_learner(&mut self, history: &LearnerHistory) -> Result<Vec<DialogueExample>> {
        let courses = &history.courses;
        let n = courses.len();
        if n < self.windowing.min_history_len {
            return Ok(Vec::new());
        }

        let first_target = n.saturating_sub(self.windowing.max_targets_per_learner).max(1);
        let mut examples = Vec::new();

        for i in first_target..n {
            let target = &courses[i];
            let context = &courses[i.saturating_sub(self.windowing.context_len)..i];
            if context.is_empty() {
                continue;
            }

            let user = self.render_user(context)?;
            let assistant = self.render_assistant(context, target)?;
            examples.push(DialogueExample::new(user, assistant));

            self.emitted += 1;
            if self.emitted % 5000 == 0 {
                log::info!("Generated {} examples so far", self.emitted);
            }
        }

        Ok(examples)
    }

    /// Build examples for every learner, in input order.
    pub fn build_all(&mut self, histories: &[LearnerHistory]) -> Result<Vec<DialogueExample>> {
        let mut all = Vec::new();
        for history in histories {
            all.extend(self.build_for_learner(history)?);
        }
        Ok(all)
    }

    fn render_user(&self, context: &[String]) -> Result<String> {
        let mut names = Vec::with_capacity(context.len());
        for course_id in context {
            let info = self.graph.course_info(course_id)?;
            names.push(format!("《{}》", info.name));
        }
        Ok(format!(
            "我之前已经按顺序学习了以下课程：{}。请推荐我的下一门课程。",
            names.join(", ")
        ))
    }

    fn render_assistant(&self, context: &[String], target: &str) -> Result<String> {
        let target_name = &self.graph.course_info(target)?.name;
        let reason = generate_reason(self.graph, context, target)?;
        Ok(format!(
            "基于你的学习轨迹，建议下一门课程学习《{target_name}》。\n\n**推荐理由**：\n{reason}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windowing() -> WindowingConfig {
        WindowingConfig {
            context_len: 5,
            min_history_len: 3,
            max_targets_per_learner: 2,
        }
    }

    fn learner(id: &str, courses: &[&str]) -> LearnerHistory {
        LearnerHistory {
            learner_id: id.to_string(),
            courses: courses.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Graph where concepts(D) = {k1}, prerequisites(k1) = {k1p}, and
    /// k1p ∈ concepts(A).
    fn prereq_graph() -> GraphStore {
        let mut g = GraphStore::new();
        g.insert_course("A", "C语言程序设计", "C语言入门");
        g.insert_course("B", "离散数学", "集合与图论");
        g.insert_course("C", "计算机组成", "硬件基础");
        g.insert_course("D", "数据结构", "线性表与树");
        g.insert_concept("k1p", "指针");
        g.insert_concept("k1", "链表");
        g.add_course_concept("A", "k1p");
        g.add_course_concept("D", "k1");
        g.add_prerequisite("k1p", "k1");
        g
    }

    #[test]
    fn test_short_history_produces_nothing() {
        let g = prereq_graph();
        let mut builder = ExampleBuilder::new(&g, windowing());

        let examples = builder.build_for_learner(&learner("U_1", &["A", "B"])).unwrap();
        assert!(examples.is_empty());
        assert_eq!(builder.emitted(), 0);
    }

    #[test]
    fn test_prerequisite_example_end_to_end() {
        let g = prereq_graph();
        let mut builder = ExampleBuilder::new(&g, windowing());

        let examples = builder
            .build_for_learner(&learner("U_1", &["A", "B", "C", "D"]))
            .unwrap();
        // Targets are the last two positions: C (context [A, B]) and
        // D (context [A, B, C]).
        assert_eq!(examples.len(), 2);

        let last = &examples[1];
        assert_eq!(last.conversations.len(), 3);
        assert_eq!(last.conversations[0].role, Role::System);
        assert_eq!(last.conversations[0].value, SYSTEM_PROMPT);

        let user = &last.conversations[1].value;
        assert!(user.contains("《C语言程序设计》, 《离散数学》, 《计算机组成》"));

        let assistant = &last.conversations[2].value;
        assert!(assistant.contains("《数据结构》"));
        assert!(assistant.contains("**推荐理由**"));
        assert!(assistant.contains("**逻辑连贯**"));
        assert!(assistant.contains("指针"));
        assert!(assistant.contains("链表"));
    }

    #[test]
    fn test_context_window_capped_at_context_len() {
        let mut g = GraphStore::new();
        for id in ["A", "B", "C", "D", "E", "F", "G"] {
            g.insert_course(id, format!("课程{id}"), format!("{id}简介"));
        }
        let mut builder = ExampleBuilder::new(&g, windowing());

        let examples = builder
            .build_for_learner(&learner("U_1", &["A", "B", "C", "D", "E", "F", "G"]))
            .unwrap();
        assert_eq!(examples.len(), 2);

        // Target G at index 6: context is indices 1..=5, exactly 5 courses,
        // and never the target itself.
        let user = &examples[1].conversations[1].value;
        for name in ["课程B", "课程C", "课程D", "课程E", "课程F"] {
            assert!(user.contains(name), "missing {name} in: {user}");
        }
        assert!(!user.contains("课程A"));
        assert!(!user.contains("课程G"));
    }

    #[test]
    fn test_exactly_one_strategy_marker() {
        let g = prereq_graph();
        let mut builder = ExampleBuilder::new(&g, windowing());

        let examples = builder
            .build_for_learner(&learner("U_1", &["A", "B", "C", "D"]))
            .unwrap();
        let markers = ["**逻辑连贯**", "**兴趣延续**", "**内容推荐**"];
        for example in &examples {
            let assistant = &example.conversations[2].value;
            let hits = markers.iter().filter(|m| assistant.contains(*m)).count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn test_build_all_counts_across_learners() {
        let g = prereq_graph();
        let mut builder = ExampleBuilder::new(&g, windowing());

        let histories = vec![
            learner("U_1", &["A", "B", "C", "D"]),
            learner("U_2", &["A", "B"]),
            learner("U_3", &["B", "C", "D"]),
        ];
        let examples = builder.build_all(&histories).unwrap();
        // U_1: 2, U_2: 0 (too short), U_3: 2
        assert_eq!(examples.len(), 4);
        assert_eq!(builder.emitted(), 4);
    }

    #[test]
    fn test_sharegpt_wire_format() {
        let g = prereq_graph();
        let mut builder = ExampleBuilder::new(&g, windowing());
        let examples = builder
            .build_for_learner(&learner("U_1", &["A", "B", "C", "D"]))
            .unwrap();

        let json = serde_json::to_value(&examples[0]).unwrap();
        let conversations = json.get("conversations").unwrap().as_array().unwrap();
        assert_eq!(conversations.len(), 3);
        assert_eq!(conversations[0]["from"], "system");
        assert_eq!(conversations[1]["from"], "user");
        assert_eq!(conversations[2]["from"], "assistant");
        assert!(conversations[1]["value"].as_str().unwrap().contains("请推荐我的下一门课程"));
    }
}
