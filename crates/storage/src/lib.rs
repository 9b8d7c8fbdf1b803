#![forbid(unsafe_code)]

pub mod code_drafts;
pub mod progress_store;
pub mod repository;
pub mod sqlite;

pub use code_drafts::CodeDrafts;
pub use progress_store::{PROGRESS_KEY, ProgressStore};
pub use repository::{DisabledLocalStore, InMemoryLocalStore, LocalStore, Storage, StorageError};
