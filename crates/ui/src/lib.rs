#![forbid(unsafe_code)]

pub mod controller;
pub mod hints;
pub mod page;
pub mod render;
pub mod shortcuts;
pub mod styles;
pub mod vm;

#[cfg(test)]
mod controller_smoke;
#[cfg(test)]
mod test_harness;

pub use controller::{AttemptReport, LessonController};
pub use hints::{HINT_TTL, HintBanner, HintId};
pub use page::{LOADING_ID, Page, PageDocument, SERVER_PROGRESS_ID};
pub use shortcuts::{KeyHandling, Shortcut, match_shortcut};
