use lesson_core::model::{Lesson, LessonId, ProgressMap, ServerProgress};
use services::is_lesson_completed;

use super::markdown_vm::markdown_to_html;
use super::time_fmt::format_datetime;

/// Display fields for one lesson.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonVm {
    pub id: LessonId,
    pub title: String,
    pub category: String,
    pub difficulty: String,
    pub theory_html: String,
    pub code_template: String,
    pub checked: bool,
    pub completed: bool,
    pub completed_label: Option<String>,
    pub attempts: u32,
}

impl LessonVm {
    #[must_use]
    pub fn new(lesson: &Lesson, server: &[ServerProgress], local: &ProgressMap) -> Self {
        let record = local.get(&lesson.id);
        let completed_at = server
            .iter()
            .find(|entry| entry.lesson_id == lesson.id)
            .and_then(ServerProgress::completed_at_utc)
            .or_else(|| record.and_then(|r| r.completed()));
        Self {
            id: lesson.id.clone(),
            title: lesson.title.clone(),
            category: lesson.category.clone(),
            difficulty: lesson.difficulty.clone(),
            theory_html: markdown_to_html(&lesson.theory),
            code_template: lesson.code_template.clone(),
            checked: !lesson.expected_output().is_empty(),
            completed: is_lesson_completed(&lesson.id, server, local),
            completed_label: completed_at.map(format_datetime),
            attempts: record.map_or(0, |r| r.attempts()),
        }
    }

    /// `[x] title` style line for plain-text listings.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let mark = if self.completed { "x" } else { " " };
        let mut line = format!("[{mark}] {:>3}  {}", self.id, self.title);
        if !self.category.is_empty() {
            line.push_str(&format!(" ({})", self.category));
        }
        if let Some(label) = &self.completed_label {
            line.push_str(&format!(" completed {label}"));
        } else if self.attempts > 0 {
            line.push_str(&format!(" attempts {}", self.attempts));
        }
        line
    }
}

#[must_use]
pub fn map_lessons(
    lessons: &[Lesson],
    server: &[ServerProgress],
    local: &ProgressMap,
) -> Vec<LessonVm> {
    lessons
        .iter()
        .map(|lesson| LessonVm::new(lesson, server, local))
        .collect()
}
