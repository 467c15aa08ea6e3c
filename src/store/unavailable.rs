//! Placeholder backend for a store that never connected
//!
//! The service keeps serving when the initial connection fails; every
//! store-backed request then fails with `STORE_UNAVAILABLE`.

use async_trait::async_trait;

use super::errors::{StoreError, StoreResult};
use super::{Document, DocumentStore};

/// Backend that rejects every operation
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> StoreError {
        StoreError::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl DocumentStore for UnavailableStore {
    fn backend(&self) -> &'static str {
        "unavailable"
    }

    async fn insert(&self, _collection: &str, _fields: Document) -> StoreResult<Document> {
        Err(self.error())
    }

    async fn find_all(&self, _collection: &str) -> StoreResult<Vec<Document>> {
        Err(self.error())
    }

    async fn find_by_id(&self, _collection: &str, _id: &str) -> StoreResult<Option<Document>> {
        Err(self.error())
    }

    async fn update_by_id(
        &self,
        _collection: &str,
        _id: &str,
        _fields: Document,
    ) -> StoreResult<Option<Document>> {
        Err(self.error())
    }

    async fn delete_by_id(&self, _collection: &str, _id: &str) -> StoreResult<Option<Document>> {
        Err(self.error())
    }
}
