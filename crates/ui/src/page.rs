//! The page the controller drives, and an in-memory document implementing it.

use std::collections::BTreeMap;

use dioxus::prelude::*;
use lesson_core::model::LessonId;

use crate::hints::{HintBanner, HintId};
use crate::styles::COMPLETED_CLASS;

/// Busy indicator element id.
pub const LOADING_ID: &str = "loading";
/// Element whose text is the embedded server progress snapshot.
pub const SERVER_PROGRESS_ID: &str = "server-progress-data";

/// Everything the controller needs from a page.
///
/// Missing elements are never an error: lookups answer `None`/`false` and
/// updates to absent elements do nothing.
pub trait Page: Send + 'static {
    /// Text content of the element with `id`.
    fn element_text(&self, id: &str) -> Option<String>;
    /// Replace the markup of an output region. `false` when it does not exist.
    fn show_output(&mut self, region: &str, html: &str) -> bool;
    fn set_loading_visible(&mut self, visible: bool);
    /// Lesson ids of every `data-lesson-id` marker, in document order.
    fn lesson_marker_ids(&self) -> Vec<LessonId>;
    fn mark_lesson_complete(&mut self, lesson: &LessonId);
    fn has_control(&self, id: &str) -> bool;
    /// Activate a control. `false` when it does not exist.
    fn click(&mut self, id: &str) -> bool;
    fn append_hint(&mut self, banner: HintBanner);
    /// Detach a hint. `false` when it is already gone.
    fn remove_hint(&mut self, id: HintId) -> bool;
    fn inject_style(&mut self, css: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LessonMarker {
    lesson: LessonId,
    completed: bool,
}

/// A page held in memory. Used by the command line client and by tests.
#[derive(Debug, Clone, Default)]
pub struct PageDocument {
    loading: Option<bool>,
    outputs: BTreeMap<String, String>,
    controls: BTreeMap<String, u32>,
    markers: Vec<LessonMarker>,
    embedded_progress: Option<String>,
    hints: Vec<HintBanner>,
    styles: Vec<String>,
}

impl PageDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hidden `#loading` indicator.
    #[must_use]
    pub fn with_loading(mut self) -> Self {
        self.loading = Some(false);
        self
    }

    #[must_use]
    pub fn with_output_region(mut self, id: impl Into<String>) -> Self {
        self.outputs.insert(id.into(), String::new());
        self
    }

    #[must_use]
    pub fn with_control(mut self, id: impl Into<String>) -> Self {
        self.controls.insert(id.into(), 0);
        self
    }

    #[must_use]
    pub fn with_lesson_marker(mut self, lesson: LessonId) -> Self {
        self.markers.push(LessonMarker {
            lesson,
            completed: false,
        });
        self
    }

    /// Embed raw text as `#server-progress-data`.
    #[must_use]
    pub fn with_embedded_progress(mut self, json: impl Into<String>) -> Self {
        self.embedded_progress = Some(json.into());
        self
    }

    /// `None` when the page has no loading indicator.
    #[must_use]
    pub fn loading_visible(&self) -> Option<bool> {
        self.loading
    }

    #[must_use]
    pub fn output(&self, region: &str) -> Option<&str> {
        self.outputs.get(region).map(String::as_str)
    }

    #[must_use]
    pub fn clicks(&self, control: &str) -> u32 {
        self.controls.get(control).copied().unwrap_or(0)
    }

    /// Whether any marker for `lesson` carries the completed class.
    #[must_use]
    pub fn is_marked_complete(&self, lesson: &LessonId) -> bool {
        self.markers
            .iter()
            .any(|marker| &marker.lesson == lesson && marker.completed)
    }

    #[must_use]
    pub fn hints(&self) -> &[HintBanner] {
        &self.hints
    }

    #[must_use]
    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    /// Serialize the document body.
    #[must_use]
    pub fn to_html(&self) -> String {
        let styles = self.styles.clone();
        let loading_style = match self.loading {
            Some(true) => Some("display: block"),
            Some(false) => Some("display: none"),
            None => None,
        };
        let markers: Vec<(String, &'static str)> = self
            .markers
            .iter()
            .map(|marker| {
                let class = if marker.completed { COMPLETED_CLASS } else { "" };
                (marker.lesson.to_string(), class)
            })
            .collect();
        let controls: Vec<String> = self.controls.keys().cloned().collect();
        let outputs: Vec<(String, String)> = self
            .outputs
            .iter()
            .map(|(id, html)| (id.clone(), html.clone()))
            .collect();
        let hints: Vec<(String, String)> = self
            .hints
            .iter()
            .map(|hint| (hint.id.to_string(), hint.html.clone()))
            .collect();
        let embedded = self.embedded_progress.clone();

        dioxus_ssr::render_element(rsx! {
            for css in styles {
                style { dangerous_inner_html: "{css}" }
            }
            if let Some(display) = loading_style {
                div { id: LOADING_ID, style: "{display}" }
            }
            if let Some(json) = embedded {
                script {
                    id: SERVER_PROGRESS_ID,
                    r#type: "application/json",
                    dangerous_inner_html: "{json}",
                }
            }
            ul {
                for (lesson, class) in markers {
                    li { class: "{class}", "data-lesson-id": "{lesson}" }
                }
            }
            for id in controls {
                button { id: "{id}" }
            }
            for (id, html) in outputs {
                div { id: "{id}", dangerous_inner_html: "{html}" }
            }
            for (id, html) in hints {
                div { id: "{id}", dangerous_inner_html: "{html}" }
            }
        })
    }
}

impl Page for PageDocument {
    fn element_text(&self, id: &str) -> Option<String> {
        if id == SERVER_PROGRESS_ID {
            return self.embedded_progress.clone();
        }
        self.outputs.get(id).cloned()
    }

    fn show_output(&mut self, region: &str, html: &str) -> bool {
        match self.outputs.get_mut(region) {
            Some(slot) => {
                *slot = html.to_string();
                true
            }
            None => false,
        }
    }

    fn set_loading_visible(&mut self, visible: bool) {
        if let Some(loading) = self.loading.as_mut() {
            *loading = visible;
        }
    }

    fn lesson_marker_ids(&self) -> Vec<LessonId> {
        self.markers.iter().map(|marker| marker.lesson.clone()).collect()
    }

    fn mark_lesson_complete(&mut self, lesson: &LessonId) {
        for marker in self.markers.iter_mut().filter(|m| &m.lesson == lesson) {
            marker.completed = true;
        }
    }

    fn has_control(&self, id: &str) -> bool {
        self.controls.contains_key(id)
    }

    fn click(&mut self, id: &str) -> bool {
        match self.controls.get_mut(id) {
            Some(clicks) => {
                *clicks = clicks.saturating_add(1);
                true
            }
            None => false,
        }
    }

    fn append_hint(&mut self, banner: HintBanner) {
        self.hints.push(banner);
    }

    fn remove_hint(&mut self, id: HintId) -> bool {
        let before = self.hints.len();
        self.hints.retain(|hint| hint.id != id);
        self.hints.len() != before
    }

    fn inject_style(&mut self, css: &str) {
        self.styles.push(css.to_string());
    }
}
