use serde::{Deserialize, Serialize};

/// Response body of the code execution endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// What a run produced, as far as rendering is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The code ran. Either field may be absent; a warning never hides output.
    Completed {
        output: Option<String>,
        warning: Option<String>,
    },
    /// The server rejected or failed the code; output is suppressed.
    Failed { error: String },
    /// The request never produced a usable response.
    ConnectionFailed { message: String },
}

impl ExecutionOutcome {
    #[must_use]
    pub fn from_result(result: ExecutionResult) -> Self {
        if result.success {
            Self::Completed {
                output: non_empty(result.output),
                warning: non_empty(result.error),
            }
        } else {
            Self::Failed {
                error: result.error.unwrap_or_default(),
            }
        }
    }

    #[must_use]
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Captured program output, empty when there was none or the run failed.
    #[must_use]
    pub fn output(&self) -> &str {
        match self {
            Self::Completed {
                output: Some(output),
                ..
            } => output,
            _ => "",
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}
