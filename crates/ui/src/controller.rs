//! Wires the services to a page: running code, progress markers, shortcuts
//! and hints.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dioxus::prelude::{Key, Modifiers};
use lesson_core::grading::check_code_correctness;
use lesson_core::model::{ExecutionOutcome, HintLevel, LessonId, ServerProgress};
use services::{ClientServices, ExecutionReport, TrackedProgress, is_lesson_completed};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::hints::{HINT_TTL, HintBanner, HintId};
use crate::page::{Page, SERVER_PROGRESS_ID};
use crate::render::{render_outcome, render_running};
use crate::shortcuts::{KeyHandling, match_shortcut};
use crate::styles::STYLESHEET;

/// Result of [`LessonController::submit_attempt`].
pub struct AttemptReport {
    pub report: ExecutionReport,
    /// The run succeeded and its output matched the expectation.
    pub correct: bool,
    pub progress: TrackedProgress,
}

pub struct LessonController<P: Page> {
    page: Arc<Mutex<P>>,
    services: ClientServices,
    shortcuts_installed: Arc<AtomicBool>,
    initialized: Arc<AtomicBool>,
}

impl<P: Page> Clone for LessonController<P> {
    fn clone(&self) -> Self {
        Self {
            page: Arc::clone(&self.page),
            services: self.services.clone(),
            shortcuts_installed: Arc::clone(&self.shortcuts_installed),
            initialized: Arc::clone(&self.initialized),
        }
    }
}

impl<P: Page> LessonController<P> {
    #[must_use]
    pub fn new(page: P, services: ClientServices) -> Self {
        Self {
            page: Arc::new(Mutex::new(page)),
            services,
            shortcuts_installed: Arc::new(AtomicBool::new(false)),
            initialized: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn services(&self) -> &ClientServices {
        &self.services
    }

    fn lock_page(&self) -> MutexGuard<'_, P> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the page.
    pub fn with_page<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        f(&mut self.lock_page())
    }

    /// Run `code` and render the outcome into `region`.
    ///
    /// The loading indicator is shown for the duration of the request and
    /// always hidden afterwards.
    pub async fn run_code(&self, code: &str, region: &str) -> ExecutionReport {
        self.with_page(|page| {
            page.set_loading_visible(true);
            page.show_output(region, &render_running());
        });

        let report = self
            .services
            .relay()
            .run_timed(code, &self.services.clock())
            .await;

        self.with_page(|page| {
            if !page.show_output(region, &render_outcome(&report.outcome)) {
                debug!(region, "output region not on page");
            }
            page.set_loading_visible(false);
        });
        report
    }

    /// Save the draft, run it, grade it against `expected` and record the
    /// attempt. A hint tells the learner how it went.
    pub async fn submit_attempt(
        &self,
        lesson: &LessonId,
        code: &str,
        expected: &str,
        region: &str,
    ) -> AttemptReport {
        match self.services.drafts().save(lesson, code).await {
            Ok(()) => {}
            Err(err) if err.is_unavailable() => {}
            Err(err) => warn!(%lesson, error = %err, "could not save code draft"),
        }

        let report = self.run_code(code, region).await;
        let correct = matches!(report.outcome, ExecutionOutcome::Completed { .. })
            && check_code_correctness(report.outcome.output(), expected);
        let progress = self.track_progress(lesson, correct).await;

        let (message, level) = if correct {
            ("Correct! Lesson completed.", HintLevel::Success)
        } else if report.outcome.is_success() {
            ("The output does not match the expected result yet.", HintLevel::Warning)
        } else {
            ("Fix the errors and try again.", HintLevel::Error)
        };
        self.show_hint(message, level);

        AttemptReport {
            report,
            correct,
            progress,
        }
    }

    /// The saved draft for `lesson`, or `template` when there is none.
    pub async fn load_code(&self, lesson: &LessonId, template: &str) -> String {
        match self.services.drafts().load(lesson).await {
            Ok(Some(code)) => code,
            Ok(None) => template.to_string(),
            Err(err) => {
                if !err.is_unavailable() {
                    warn!(%lesson, error = %err, "could not load code draft");
                }
                template.to_string()
            }
        }
    }

    /// Drop the saved draft and hand back `template`.
    pub async fn reset_code(&self, lesson: &LessonId, template: &str) -> String {
        match self.services.drafts().clear(lesson).await {
            Ok(()) => {}
            Err(err) if err.is_unavailable() => {}
            Err(err) => warn!(%lesson, error = %err, "could not clear code draft"),
        }
        template.to_string()
    }

    /// Record an attempt, refresh the markers from the local cache and push
    /// to the server in the background.
    ///
    /// Achievements reported by the push are announced as hints.
    pub async fn track_progress(&self, lesson: &LessonId, completed: bool) -> TrackedProgress {
        let tracked = self
            .services
            .tracker()
            .track_progress(lesson, completed)
            .await;
        self.update_progress_elements(&[]).await;

        let controller = self.clone();
        let push = tokio::spawn(async move {
            let result = tracked.push.await.unwrap_or_else(|err| Err(err.into()));
            if let Ok(response) = &result {
                for achievement in &response.new_achievements {
                    controller.show_hint(
                        format!("Achievement unlocked: {}", achievement.announcement()),
                        HintLevel::Success,
                    );
                }
            }
            result
        });

        TrackedProgress {
            record: tracked.record,
            push,
        }
    }

    /// Paint the markers from the embedded snapshot, then again once the
    /// server has answered. The returned handle resolves after the second
    /// pass.
    pub async fn update_progress_ui(&self) -> JoinHandle<()> {
        let snapshot = self.embedded_progress();
        self.update_progress_elements(&snapshot).await;

        let controller = self.clone();
        tokio::spawn(async move {
            let live = controller
                .services
                .tracker()
                .load_progress_from_server()
                .await;
            controller.update_progress_elements(&live).await;
        })
    }

    /// Mark every lesson marker whose lesson is complete, either in `server`
    /// or in the local cache. Returns how many markers were marked.
    pub async fn update_progress_elements(&self, server: &[ServerProgress]) -> usize {
        let local = self.services.tracker().local_progress().await;
        let mut page = self.lock_page();
        let mut marked = 0;
        for lesson in page.lesson_marker_ids() {
            if is_lesson_completed(&lesson, server, &local) {
                page.mark_lesson_complete(&lesson);
                marked += 1;
            }
        }
        marked
    }

    fn embedded_progress(&self) -> Vec<ServerProgress> {
        let Some(text) = self.with_page(|page| page.element_text(SERVER_PROGRESS_ID)) else {
            return Vec::new();
        };
        match serde_json::from_str(&text) {
            Ok(entries) => entries,
            Err(err) => {
                error!(error = %err, "failed to parse embedded progress data");
                Vec::new()
            }
        }
    }

    /// React to a key press. Does nothing until [`LessonController::initialize`]
    /// has run.
    pub fn handle_key(&self, key: &Key, modifiers: Modifiers) -> KeyHandling {
        if !self.shortcuts_installed.load(Ordering::Acquire) {
            return KeyHandling::default();
        }
        let Some(shortcut) = match_shortcut(key, modifiers) else {
            return KeyHandling::default();
        };

        let mut page = self.lock_page();
        let clicked = shortcut
            .targets()
            .iter()
            .copied()
            .find(|id| page.has_control(id));
        if let Some(id) = clicked {
            page.click(id);
        }
        KeyHandling {
            prevent_default: true,
            clicked,
        }
    }

    /// Show a banner and remove it after [`HINT_TTL`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn show_hint(&self, message: impl Into<String>, level: HintLevel) -> HintId {
        let banner = HintBanner::new(message, level);
        let id = banner.id;
        self.with_page(|page| page.append_hint(banner));

        let page = Arc::clone(&self.page);
        tokio::spawn(async move {
            tokio::time::sleep(HINT_TTL).await;
            page.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove_hint(id);
        });
        id
    }

    /// Install shortcuts, paint progress and inject the stylesheet. Only the
    /// first call does anything; it returns the handle of the server refresh.
    pub async fn initialize(&self) -> Option<JoinHandle<()>> {
        if self.initialized.swap(true, Ordering::AcqRel) {
            return None;
        }
        self.shortcuts_installed.store(true, Ordering::Release);
        let refresh = self.update_progress_ui().await;
        self.with_page(|page| page.inject_style(STYLESHEET));
        Some(refresh)
    }
}
