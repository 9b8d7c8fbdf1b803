use std::sync::Arc;

use lesson_core::model::{AchievementSummary, Lesson, LessonId};

use crate::api::LessonApi;
use crate::error::ApiError;

/// Read-only access to the lesson catalog and achievements.
#[derive(Clone)]
pub struct CatalogService {
    api: Arc<dyn LessonApi>,
}

impl CatalogService {
    #[must_use]
    pub fn new(api: Arc<dyn LessonApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the catalog cannot be fetched.
    pub async fn lessons(&self) -> Result<Vec<Lesson>, ApiError> {
        self.api.list_lessons().await
    }

    /// Look a single lesson up in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the catalog cannot be fetched.
    pub async fn lesson(&self, id: &LessonId) -> Result<Option<Lesson>, ApiError> {
        let lessons = self.api.list_lessons().await?;
        Ok(lessons.into_iter().find(|lesson| &lesson.id == id))
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the summary cannot be fetched.
    pub async fn achievements(&self) -> Result<AchievementSummary, ApiError> {
        self.api.achievements().await
    }
}
