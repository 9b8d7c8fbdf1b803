use serde::{Deserialize, Serialize};

use crate::model::ids::LessonId;

/// A lesson as listed by the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub description: String,
    /// Markdown.
    #[serde(default)]
    pub theory: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub code_template: String,
    #[serde(default)]
    pub expected_output: Option<String>,
    #[serde(default)]
    pub hints: Vec<String>,
}

impl Lesson {
    /// Expected program output, empty when the lesson has no automatic check.
    #[must_use]
    pub fn expected_output(&self) -> &str {
        self.expected_output.as_deref().unwrap_or("")
    }
}
