use std::sync::Arc;

use lesson_core::model::LessonId;

use crate::repository::{LocalStore, StorageError};

/// Last-saved editor contents per lesson, stored under `lesson_<id>_code`.
#[derive(Clone)]
pub struct CodeDrafts {
    store: Arc<dyn LocalStore>,
}

impl CodeDrafts {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn key(lesson: &LessonId) -> String {
        format!("lesson_{lesson}_code")
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub async fn save(&self, lesson: &LessonId, code: &str) -> Result<(), StorageError> {
        self.store.set_item(&Self::key(lesson), code).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the read fails.
    pub async fn load(&self, lesson: &LessonId) -> Result<Option<String>, StorageError> {
        self.store.get_item(&Self::key(lesson)).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    pub async fn clear(&self, lesson: &LessonId) -> Result<(), StorageError> {
        self.store.remove_item(&Self::key(lesson)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryLocalStore;

    #[tokio::test]
    async fn drafts_are_keyed_per_lesson() {
        let local = Arc::new(InMemoryLocalStore::new());
        let drafts = CodeDrafts::new(local.clone());
        let l7 = LessonId::new("7").unwrap();

        drafts.save(&l7, "void main() {}").await.unwrap();
        assert_eq!(
            local.get_item("lesson_7_code").await.unwrap().as_deref(),
            Some("void main() {}")
        );
        assert_eq!(
            drafts.load(&LessonId::new("8").unwrap()).await.unwrap(),
            None
        );

        drafts.clear(&l7).await.unwrap();
        assert_eq!(drafts.load(&l7).await.unwrap(), None);
    }
}
