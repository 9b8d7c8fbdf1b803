#![forbid(unsafe_code)]

pub mod api;
pub mod catalog_service;
pub mod client_services;
pub mod config;
pub mod error;
pub mod execution_relay;
pub mod http_api;
pub mod progress_tracker;
#[cfg(any(test, feature = "test-util"))]
pub mod scripted_api;

pub use lesson_core::Clock;

pub use api::{LessonApi, ProgressResponse, SaveProgressRequest, SaveProgressResponse};
pub use catalog_service::CatalogService;
pub use client_services::ClientServices;
pub use config::ApiConfig;
pub use error::{ApiError, ConfigError, SyncError};
pub use execution_relay::{ExecutionRelay, ExecutionReport};
pub use http_api::HttpLessonApi;
pub use progress_tracker::{ProgressTracker, TrackedProgress, is_lesson_completed};
#[cfg(any(test, feature = "test-util"))]
pub use scripted_api::ScriptedLessonApi;
