use std::sync::Arc;

use lesson_core::model::CourseId;
use storage::{CodeDrafts, Storage};

use crate::Clock;
use crate::api::LessonApi;
use crate::catalog_service::CatalogService;
use crate::config::ApiConfig;
use crate::execution_relay::ExecutionRelay;
use crate::http_api::HttpLessonApi;
use crate::progress_tracker::ProgressTracker;

/// Assembles the client-facing services over one api and one store.
#[derive(Clone)]
pub struct ClientServices {
    clock: Clock,
    relay: Arc<ExecutionRelay>,
    tracker: Arc<ProgressTracker>,
    catalog: Arc<CatalogService>,
    drafts: CodeDrafts,
}

impl ClientServices {
    /// Services talking to the HTTP server described by `config`.
    #[must_use]
    pub fn http(config: ApiConfig, clock: Clock, storage: &Storage) -> Self {
        let course_id = config.course_id().clone();
        let api: Arc<dyn LessonApi> = Arc::new(HttpLessonApi::new(config));
        Self::new(api, course_id, clock, storage)
    }

    #[must_use]
    pub fn new(
        api: Arc<dyn LessonApi>,
        course_id: CourseId,
        clock: Clock,
        storage: &Storage,
    ) -> Self {
        let relay = Arc::new(ExecutionRelay::new(Arc::clone(&api)));
        let tracker = Arc::new(ProgressTracker::new(
            Arc::clone(&api),
            storage.progress.clone(),
            clock,
            course_id,
        ));
        let catalog = Arc::new(CatalogService::new(api));
        Self {
            clock,
            relay,
            tracker,
            catalog,
            drafts: storage.drafts.clone(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn relay(&self) -> Arc<ExecutionRelay> {
        Arc::clone(&self.relay)
    }

    #[must_use]
    pub fn tracker(&self) -> Arc<ProgressTracker> {
        Arc::clone(&self.tracker)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn drafts(&self) -> CodeDrafts {
        self.drafts.clone()
    }
}
