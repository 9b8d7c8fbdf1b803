use async_trait::async_trait;
use lesson_core::model::{AchievementSummary, ExecutionResult, Lesson};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::api::{
    ACHIEVEMENTS_PATH, EXECUTE_PATH, GET_PROGRESS_PATH, LESSONS_PATH, LessonApi,
    ProgressResponse, SAVE_PROGRESS_PATH, SaveProgressRequest, SaveProgressResponse,
    execute_body,
};
use crate::config::ApiConfig;
use crate::error::ApiError;

/// `LessonApi` over HTTP with JSON bodies.
#[derive(Clone)]
pub struct HttpLessonApi {
    client: Client,
    config: ApiConfig,
}

impl HttpLessonApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.config
            .endpoint(path)
            .map_err(|err| ApiError::Network(err.to_string()))
    }
}

/// Decode a `success` envelope regardless of status: the server reports
/// application failures as `success: false` bodies, sometimes with a 500.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await?;
    match serde_json::from_slice(&body) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(ApiError::Status(status.as_u16())),
        Err(err) => Err(ApiError::Decode(err.to_string())),
    }
}

/// Decode a plain resource: anything but a 2xx status is an error.
async fn decode_resource<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
}

#[async_trait]
impl LessonApi for HttpLessonApi {
    async fn execute_code(&self, code: &str) -> Result<ExecutionResult, ApiError> {
        let url = self.url(EXECUTE_PATH)?;
        debug!(%url, bytes = code.len(), "submitting code");
        let response = self
            .client
            .post(url)
            .json(&execute_body(code))
            .send()
            .await?;
        decode(response).await
    }

    async fn save_progress(
        &self,
        request: &SaveProgressRequest,
    ) -> Result<SaveProgressResponse, ApiError> {
        let url = self.url(SAVE_PROGRESS_PATH)?;
        debug!(%url, lesson = %request.lesson_id, completed = request.completed, "saving progress");
        let response = self.client.post(url).json(request).send().await?;
        decode(response).await
    }

    async fn get_progress(&self) -> Result<ProgressResponse, ApiError> {
        let url = self.url(GET_PROGRESS_PATH)?;
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    async fn list_lessons(&self) -> Result<Vec<Lesson>, ApiError> {
        let url = self.url(LESSONS_PATH)?;
        let response = self.client.get(url).send().await?;
        decode_resource(response).await
    }

    async fn achievements(&self) -> Result<AchievementSummary, ApiError> {
        let url = self.url(ACHIEVEMENTS_PATH)?;
        let response = self.client.get(url).send().await?;
        decode_resource(response).await
    }
}
