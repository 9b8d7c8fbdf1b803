use std::env;

use lesson_core::model::CourseId;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Course reported with every progress save. The server tracks progress per
/// (course, lesson) but pages do not yet say which course they belong to.
pub const DEFAULT_COURSE_ID: &str = "dart-basics";

/// Where the lesson server lives and which course progress is filed under.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    base_url: Url,
    course_id: CourseId,
}

impl ApiConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL does not parse or the course id is blank.
    pub fn new(base_url: &str, course_id: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Url::parse(base_url.trim())?,
            course_id: CourseId::new(course_id)?,
        })
    }

    /// Reads `LESSON_API_BASE_URL` and `LESSON_COURSE_ID`, falling back to
    /// the local development server and the default course.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a provided value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("LESSON_API_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let course_id = env::var("LESSON_COURSE_ID")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COURSE_ID.into());
        Self::new(&base_url, &course_id)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    /// Absolute URL for an API path such as `/api/get_progress`.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if `path` cannot be joined onto the base.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}
