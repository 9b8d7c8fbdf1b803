//! HTML fragments for the page.
//!
//! Untrusted text only ever enters markup as an rsx text node, which the
//! renderer escapes; nothing is spliced into markup as raw text.

use dioxus::prelude::*;
use lesson_core::model::{ExecutionOutcome, HintLevel};

fn to_html(element: Element) -> String {
    dioxus_ssr::render_element(element)
}

/// Placeholder shown in the output region while a run is in flight.
#[must_use]
pub fn render_running() -> String {
    to_html(rsx! {
        div { class: "output-info", "Running code..." }
    })
}

#[must_use]
pub fn render_outcome(outcome: &ExecutionOutcome) -> String {
    let element = match outcome {
        ExecutionOutcome::Completed { output, warning } => rsx! {
            if let Some(text) = output {
                div { class: "output-success", "{text}" }
            } else {
                div { class: "output-info", "Code executed successfully (no output)" }
            }
            if let Some(text) = warning {
                div { class: "output-warning", "Warnings:\n{text}" }
            }
        },
        ExecutionOutcome::Failed { error } => rsx! {
            div { class: "output-error", "Error:\n{error}" }
        },
        ExecutionOutcome::ConnectionFailed { message } => rsx! {
            div { class: "output-error", "Connection error: {message}" }
        },
    };
    to_html(element)
}

#[must_use]
pub fn render_hint(message: &str, level: HintLevel) -> String {
    let class = format!("hint {}", level.css_class());
    to_html(rsx! {
        div { class: "{class}", role: "status", "{message}" }
    })
}
