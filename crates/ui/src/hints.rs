use std::fmt;
use std::time::Duration;

use lesson_core::model::HintLevel;
use uuid::Uuid;

use crate::render::render_hint;

/// How long a hint stays on the page.
pub const HINT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HintId(Uuid);

impl HintId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HintId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hint-{}", self.0)
    }
}

/// A transient notification banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintBanner {
    pub id: HintId,
    pub level: HintLevel,
    pub message: String,
    pub html: String,
}

impl HintBanner {
    #[must_use]
    pub fn new(message: impl Into<String>, level: HintLevel) -> Self {
        let message = message.into();
        let html = render_hint(&message, level);
        Self {
            id: HintId::new(),
            level,
            message,
            html,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banners_get_distinct_ids() {
        let a = HintBanner::new("saved", HintLevel::Success);
        let b = HintBanner::new("saved", HintLevel::Success);
        assert_ne!(a.id, b.id);
        assert!(a.html.contains("hint-success"));
        assert!(a.id.to_string().starts_with("hint-"));
    }
}
