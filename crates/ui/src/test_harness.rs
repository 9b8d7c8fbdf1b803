use std::sync::Arc;

use lesson_core::model::{CourseId, ExecutionResult, LessonId};
use lesson_core::time::fixed_clock;
use services::{ClientServices, ScriptedLessonApi};
use storage::Storage;

use crate::controller::LessonController;
use crate::page::PageDocument;

pub const OUTPUT: &str = "output";

pub struct Harness {
    pub api: ScriptedLessonApi,
    pub storage: Storage,
    pub controller: LessonController<PageDocument>,
}

pub fn lesson(id: &str) -> LessonId {
    LessonId::new(id).unwrap()
}

/// A lesson page with a loading indicator, one output region, the run and
/// reset buttons and markers for lessons 1 to 3.
pub fn lesson_page() -> PageDocument {
    PageDocument::new()
        .with_loading()
        .with_output_region(OUTPUT)
        .with_control("run-code")
        .with_control("reset-code")
        .with_lesson_marker(lesson("1"))
        .with_lesson_marker(lesson("2"))
        .with_lesson_marker(lesson("3"))
}

pub fn harness(page: PageDocument) -> Harness {
    harness_with_storage(page, Storage::in_memory())
}

pub fn harness_with_storage(page: PageDocument, storage: Storage) -> Harness {
    let api = ScriptedLessonApi::new();
    let services = ClientServices::new(
        Arc::new(api.clone()),
        CourseId::new("dart-basics").unwrap(),
        fixed_clock(),
        &storage,
    );
    Harness {
        api,
        storage,
        controller: LessonController::new(page, services),
    }
}

pub fn printed(output: &str) -> ExecutionResult {
    ExecutionResult {
        success: true,
        output: Some(output.to_string()),
        error: None,
    }
}

/// Decode the angle bracket entities, named or numeric.
pub fn unescaped(html: &str) -> String {
    html.replace("&lt;", "<")
        .replace("&#60;", "<")
        .replace("&gt;", ">")
        .replace("&#62;", ">")
}
