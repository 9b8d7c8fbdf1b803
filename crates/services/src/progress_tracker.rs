use std::sync::Arc;

use lesson_core::Clock;
use lesson_core::model::{CourseId, LessonId, ProgressMap, ProgressRecord, ServerProgress};
use storage::{ProgressStore, StorageError};
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::api::{LessonApi, SaveProgressRequest, SaveProgressResponse};
use crate::error::SyncError;

/// Keeps the local progress cache and the server in step.
#[derive(Clone)]
pub struct ProgressTracker {
    api: Arc<dyn LessonApi>,
    store: ProgressStore,
    clock: Clock,
    course_id: CourseId,
}

/// Result of [`ProgressTracker::track_progress`].
///
/// `record` is the updated local record, or `None` when local storage is
/// unavailable. `push` resolves once the server has answered; dropping it
/// leaves the push running in the background.
pub struct TrackedProgress {
    pub record: Option<ProgressRecord>,
    pub push: JoinHandle<Result<SaveProgressResponse, SyncError>>,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(
        api: Arc<dyn LessonApi>,
        store: ProgressStore,
        clock: Clock,
        course_id: CourseId,
    ) -> Self {
        Self {
            api,
            store,
            clock,
            course_id,
        }
    }

    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    /// Count an attempt at `lesson` locally, then push it to the server.
    ///
    /// The local write completes before the push is issued. Push failures
    /// are logged by the background task and returned through the handle;
    /// nothing is retried.
    pub async fn track_progress(&self, lesson: &LessonId, completed: bool) -> TrackedProgress {
        let now = self.clock.now();
        let record = match self
            .store
            .update(|map| map.track(lesson, completed, now).clone())
            .await
        {
            Ok(record) => Some(record),
            Err(StorageError::Unavailable) => None,
            Err(err) => {
                warn!(%lesson, error = %err, "could not update cached progress");
                None
            }
        };

        let tracker = self.clone();
        let lesson = lesson.clone();
        let push = tokio::spawn(async move {
            let result = tracker.push_progress(&lesson, completed).await;
            if let Err(err) = &result {
                error!(%lesson, error = %err, "failed to save progress");
            }
            result
        });

        TrackedProgress { record, push }
    }

    /// Send one progress update for the configured course.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Network` if the server cannot be reached and
    /// `SyncError::Application` if it answers `success: false`.
    pub async fn push_progress(
        &self,
        lesson: &LessonId,
        completed: bool,
    ) -> Result<SaveProgressResponse, SyncError> {
        let request = SaveProgressRequest {
            course_id: self.course_id.clone(),
            lesson_id: lesson.clone(),
            completed,
        };
        let response = self.api.save_progress(&request).await?;
        if response.success {
            Ok(response)
        } else {
            Err(SyncError::Application(
                response.error.unwrap_or_else(|| "unknown error".into()),
            ))
        }
    }

    /// Fetch the server's progress list and replace the local cache with it.
    ///
    /// Server entries carry no start time or attempt count, so those reset.
    /// The cache is left alone when the fetch fails, including a successful
    /// answer without a progress list.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Network` or `SyncError::Application`.
    pub async fn fetch_server_progress(&self) -> Result<Vec<ServerProgress>, SyncError> {
        let response = self.api.get_progress().await?;
        if !response.success {
            return Err(SyncError::Application(
                response.error.unwrap_or_else(|| "unknown error".into()),
            ));
        }
        let Some(entries) = response.progress else {
            return Err(SyncError::Application("missing progress".into()));
        };

        match self.store.set(&ProgressMap::from_server(&entries)).await {
            Ok(()) | Err(StorageError::Unavailable) => {}
            Err(err) => warn!(error = %err, "could not cache server progress"),
        }
        Ok(entries)
    }

    /// [`ProgressTracker::fetch_server_progress`], logging failures and
    /// answering an empty list instead.
    pub async fn load_progress_from_server(&self) -> Vec<ServerProgress> {
        match self.fetch_server_progress().await {
            Ok(entries) => entries,
            Err(err) => {
                error!(error = %err, "failed to load progress");
                Vec::new()
            }
        }
    }

    /// The cached map, or an empty one when it cannot be read.
    pub async fn local_progress(&self) -> ProgressMap {
        match self.store.get().await {
            Ok(map) => map,
            Err(StorageError::Unavailable) => ProgressMap::new(),
            Err(err) => {
                warn!(error = %err, "could not read cached progress");
                ProgressMap::new()
            }
        }
    }
}

/// Whether `lesson` counts as completed. The first server entry for the
/// lesson decides when it says completed; otherwise the local cache does.
#[must_use]
pub fn is_lesson_completed(lesson: &LessonId, server: &[ServerProgress], local: &ProgressMap) -> bool {
    let on_server = server
        .iter()
        .find(|entry| &entry.lesson_id == lesson)
        .is_some_and(ServerProgress::is_completed);
    on_server || local.is_completed(lesson)
}
