//! Global keyboard shortcuts.

use dioxus::prelude::{Key, Modifiers};

const RUN_TARGETS: &[&str] = &["run-code", "run-demo"];
const RESET_TARGETS: &[&str] = &["reset-code"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl/Cmd+Enter.
    Run,
    /// Ctrl/Cmd+R.
    Reset,
}

impl Shortcut {
    /// Control ids to try, first present wins.
    #[must_use]
    pub fn targets(self) -> &'static [&'static str] {
        match self {
            Self::Run => RUN_TARGETS,
            Self::Reset => RESET_TARGETS,
        }
    }
}

/// What the page should do with a key event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyHandling {
    pub prevent_default: bool,
    /// The control that was clicked, if any.
    pub clicked: Option<&'static str>,
}

#[must_use]
pub fn match_shortcut(key: &Key, modifiers: Modifiers) -> Option<Shortcut> {
    if !(modifiers.contains(Modifiers::CONTROL) || modifiers.contains(Modifiers::META)) {
        return None;
    }
    match key {
        Key::Enter => Some(Shortcut::Run),
        Key::Character(text) if text == "r" => Some(Shortcut::Reset),
        _ => None,
    }
}
