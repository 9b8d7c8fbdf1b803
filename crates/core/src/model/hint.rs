use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity of a transient hint banner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown hint level: {0}")]
pub struct HintLevelError(pub String);

impl HintLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// CSS class carrying the level's colour (`hint-error`, ...).
    #[must_use]
    pub fn css_class(self) -> String {
        format!("hint-{}", self.as_str())
    }
}

impl fmt::Display for HintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HintLevel {
    type Err = HintLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(HintLevelError(s.to_string())),
        }
    }
}
