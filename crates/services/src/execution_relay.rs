use std::sync::Arc;

use lesson_core::Clock;
use lesson_core::model::ExecutionOutcome;
use lesson_core::time::{elapsed_ms, format_execution_time};
use tracing::warn;

use crate::api::LessonApi;

/// Sends code to the execution endpoint and classifies the answer.
#[derive(Clone)]
pub struct ExecutionRelay {
    api: Arc<dyn LessonApi>,
}

/// A classified run together with how long the round trip took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub outcome: ExecutionOutcome,
    pub elapsed_ms: u64,
}

impl ExecutionReport {
    #[must_use]
    pub fn timing_label(&self) -> String {
        format!("Execution time: {}ms", self.elapsed_ms)
    }
}

impl ExecutionRelay {
    #[must_use]
    pub fn new(api: Arc<dyn LessonApi>) -> Self {
        Self { api }
    }

    /// Run `code` remotely. Never fails: transport and decoding problems are
    /// reported as `ExecutionOutcome::ConnectionFailed`.
    pub async fn run(&self, code: &str) -> ExecutionOutcome {
        match self.api.execute_code(code).await {
            Ok(result) => ExecutionOutcome::from_result(result),
            Err(err) => {
                warn!(error = %err, "code execution request failed");
                ExecutionOutcome::connection_failed(err.to_string())
            }
        }
    }

    /// Like [`ExecutionRelay::run`], timed with `clock`.
    pub async fn run_timed(&self, code: &str, clock: &Clock) -> ExecutionReport {
        let start = clock.now();
        let outcome = self.run(code).await;
        let end = clock.now();
        tracing::debug!(timing = %format_execution_time(start, end), "execution finished");
        ExecutionReport {
            outcome,
            elapsed_ms: elapsed_ms(start, end),
        }
    }
}
