use async_trait::async_trait;
use lesson_core::model::{
    AchievementSummary, CourseId, ExecutionResult, Lesson, LessonId, NewAchievement,
    ServerProgress,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const EXECUTE_PATH: &str = "/api/execute_dart";
pub const SAVE_PROGRESS_PATH: &str = "/api/save_progress";
pub const GET_PROGRESS_PATH: &str = "/api/get_progress";
pub const LESSONS_PATH: &str = "/api/lessons";
pub const ACHIEVEMENTS_PATH: &str = "/api/achievements";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ExecuteRequest<'a> {
    code: &'a str,
}

/// Body of a progress save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveProgressRequest {
    pub course_id: CourseId,
    pub lesson_id: LessonId,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveProgressResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Only reported by servers that award achievements on save.
    #[serde(default)]
    pub new_achievements: Vec<NewAchievement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub progress: Option<Vec<ServerProgress>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The lesson server as seen by the client.
///
/// Application-level failures (`success: false`) are returned as values;
/// only transport and decoding problems are errors.
#[async_trait]
pub trait LessonApi: Send + Sync {
    /// Run `code` on the server and return its captured output.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the response is malformed.
    async fn execute_code(&self, code: &str) -> Result<ExecutionResult, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the response is malformed.
    async fn save_progress(
        &self,
        request: &SaveProgressRequest,
    ) -> Result<SaveProgressResponse, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the response is malformed.
    async fn get_progress(&self) -> Result<ProgressResponse, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the response is malformed.
    async fn list_lessons(&self) -> Result<Vec<Lesson>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the response is malformed.
    async fn achievements(&self) -> Result<AchievementSummary, ApiError>;
}

pub(crate) fn execute_body(code: &str) -> impl Serialize + '_ {
    ExecuteRequest { code }
}
