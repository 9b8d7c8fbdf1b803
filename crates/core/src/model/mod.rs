mod achievement;
mod execution;
mod hint;
mod ids;
mod lesson;
mod progress;

pub use achievement::{Achievement, AchievementSummary, NewAchievement};
pub use execution::{ExecutionOutcome, ExecutionResult};
pub use hint::{HintLevel, HintLevelError};
pub use ids::{CourseId, LessonId, ParseIdError};
pub use lesson::Lesson;
pub use progress::{ProgressMap, ProgressRecord, ServerProgress};
