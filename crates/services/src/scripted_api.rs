//! An in-process `LessonApi` with scripted answers, for tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use lesson_core::model::{AchievementSummary, ExecutionResult, Lesson, ServerProgress};

use crate::api::{LessonApi, ProgressResponse, SaveProgressRequest, SaveProgressResponse};
use crate::error::ApiError;

struct Script {
    execution: Result<ExecutionResult, String>,
    save: Result<SaveProgressResponse, String>,
    progress: Result<ProgressResponse, String>,
    lessons: Vec<Lesson>,
    achievements: AchievementSummary,
    executed: Vec<String>,
    saved: Vec<SaveProgressRequest>,
    progress_queries: usize,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            execution: Err("no execution scripted".into()),
            save: Ok(SaveProgressResponse {
                success: true,
                ..SaveProgressResponse::default()
            }),
            progress: Ok(ProgressResponse {
                success: true,
                progress: Some(Vec::new()),
                error: None,
            }),
            lessons: Vec::new(),
            achievements: AchievementSummary::default(),
            executed: Vec::new(),
            saved: Vec::new(),
            progress_queries: 0,
        }
    }
}

/// Answers every call from a script and records what it was asked.
///
/// Clones share the script, so a test can keep a handle and change answers
/// after handing the api to a service. `Err` strings surface as
/// `ApiError::Network`.
#[derive(Clone, Default)]
pub struct ScriptedLessonApi {
    script: Arc<Mutex<Script>>,
}

impl ScriptedLessonApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_execution(&self, result: ExecutionResult) {
        self.script().execution = Ok(result);
    }

    pub fn set_execution_error(&self, message: impl Into<String>) {
        self.script().execution = Err(message.into());
    }

    pub fn set_save_response(&self, response: SaveProgressResponse) {
        self.script().save = Ok(response);
    }

    pub fn set_save_error(&self, message: impl Into<String>) {
        self.script().save = Err(message.into());
    }

    /// Answer progress queries successfully with `entries`.
    pub fn set_progress(&self, entries: Vec<ServerProgress>) {
        self.script().progress = Ok(ProgressResponse {
            success: true,
            progress: Some(entries),
            error: None,
        });
    }

    /// Answer progress queries with `response` verbatim.
    pub fn set_progress_response(&self, response: ProgressResponse) {
        self.script().progress = Ok(response);
    }

    /// Answer progress queries with `success: false`.
    pub fn set_progress_rejected(&self, message: impl Into<String>) {
        self.script().progress = Ok(ProgressResponse {
            success: false,
            progress: None,
            error: Some(message.into()),
        });
    }

    pub fn set_progress_error(&self, message: impl Into<String>) {
        self.script().progress = Err(message.into());
    }

    pub fn set_lessons(&self, lessons: Vec<Lesson>) {
        self.script().lessons = lessons;
    }

    pub fn set_achievements(&self, summary: AchievementSummary) {
        self.script().achievements = summary;
    }

    /// Code submitted so far, oldest first.
    #[must_use]
    pub fn executed(&self) -> Vec<String> {
        self.script().executed.clone()
    }

    /// Progress saves received so far, oldest first.
    #[must_use]
    pub fn saved(&self) -> Vec<SaveProgressRequest> {
        self.script().saved.clone()
    }

    /// How many times progress was fetched.
    #[must_use]
    pub fn progress_queries(&self) -> usize {
        self.script().progress_queries
    }
}

#[async_trait]
impl LessonApi for ScriptedLessonApi {
    async fn execute_code(&self, code: &str) -> Result<ExecutionResult, ApiError> {
        let mut script = self.script();
        script.executed.push(code.to_string());
        script.execution.clone().map_err(ApiError::Network)
    }

    async fn save_progress(
        &self,
        request: &SaveProgressRequest,
    ) -> Result<SaveProgressResponse, ApiError> {
        let mut script = self.script();
        script.saved.push(request.clone());
        script.save.clone().map_err(ApiError::Network)
    }

    async fn get_progress(&self) -> Result<ProgressResponse, ApiError> {
        let mut script = self.script();
        script.progress_queries += 1;
        script.progress.clone().map_err(ApiError::Network)
    }

    async fn list_lessons(&self) -> Result<Vec<Lesson>, ApiError> {
        Ok(self.script().lessons.clone())
    }

    async fn achievements(&self) -> Result<AchievementSummary, ApiError> {
        Ok(self.script().achievements.clone())
    }
}
