//! Persistence gateway
//!
//! [`DocumentStore`] is the backend seam: untyped JSON documents in named
//! collections. [`Collection`] layers a typed view over one collection for
//! an [`Entity`], which is what the HTTP handlers talk to.
//!
//! Backends:
//! - [`MemoryStore`] for `memory://` URLs and tests
//! - `MongoStore` for `mongodb://` URLs (cargo feature `mongodb`)
//! - [`UnavailableStore`] when the initial connection failed
//!
//! Operations are independent and non-transactional; concurrent writes to
//! the same id are last-write-wins.

mod errors;
mod memory;
#[cfg(feature = "mongodb")]
mod mongo;
mod unavailable;

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::{StoreConfig, StoreUrl};

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
#[cfg(feature = "mongodb")]
pub use mongo::MongoStore;
pub use unavailable::UnavailableStore;

/// A stored document: a JSON object whose `_id` is set by the store
pub type Document = Map<String, Value>;

/// Key holding the store-assigned identifier
pub const ID_FIELD: &str = "_id";

/// Checks that `id` has the store's identifier shape: 24 lowercase hex
/// characters, the form every backend hands out.
pub fn parse_object_id(id: &str) -> StoreResult<()> {
    let lower_hex = |b: u8| b.is_ascii_digit() || (b'a'..=b'f').contains(&b);
    if id.len() == 24 && id.bytes().all(lower_hex) {
        Ok(())
    } else {
        Err(StoreError::InvalidId(format!(
            "'{}' is not a 24 character lowercase hex string",
            id
        )))
    }
}

/// Document store backend
///
/// Implementations assign ids on insert and ignore any `_id` passed in
/// `fields`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name for logs
    fn backend(&self) -> &'static str;

    /// Insert a document and return it with its assigned id
    async fn insert(&self, collection: &str, fields: Document) -> StoreResult<Document>;

    /// Return every document in the collection
    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Find a document by id
    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Overwrite the given fields and return the document after the write
    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> StoreResult<Option<Document>>;

    /// Remove a document and return it
    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;
}

/// A record type persisted in its own collection
pub trait Entity: DeserializeOwned + Send + Sync + 'static {
    /// Validated, writable fields of the record
    type Fields: Serialize + Send + Sync;

    /// Collection name
    const COLLECTION: &'static str;

    /// Store-assigned identifier
    fn id(&self) -> &str;
}

/// Typed gateway over one collection
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Persist a new record; the store assigns its id
    pub async fn create(&self, fields: &T::Fields) -> StoreResult<T> {
        let stored = self.store.insert(T::COLLECTION, encode(fields)?).await?;
        let record: T = decode(stored)?;
        debug!(collection = T::COLLECTION, id = record.id(), "record created");
        Ok(record)
    }

    /// Every record in the collection
    pub async fn list_all(&self) -> StoreResult<Vec<T>> {
        self.store
            .find_all(T::COLLECTION)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<T>> {
        self.store
            .find_by_id(T::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }

    /// Overwrite the record's fields; returns the post-update record
    pub async fn update_by_id(&self, id: &str, fields: &T::Fields) -> StoreResult<Option<T>> {
        let updated: Option<T> = self
            .store
            .update_by_id(T::COLLECTION, id, encode(fields)?)
            .await?
            .map(decode)
            .transpose()?;
        if let Some(record) = &updated {
            debug!(collection = T::COLLECTION, id = record.id(), "record updated");
        }
        Ok(updated)
    }

    /// Remove the record; returns what was removed
    pub async fn delete_by_id(&self, id: &str) -> StoreResult<Option<T>> {
        let removed: Option<T> = self
            .store
            .delete_by_id(T::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()?;
        if let Some(record) = &removed {
            debug!(collection = T::COLLECTION, id = record.id(), "record removed");
        }
        Ok(removed)
    }
}

fn encode<F: Serialize>(fields: &F) -> StoreResult<Document> {
    match serde_json::to_value(fields)? {
        Value::Object(doc) => Ok(doc),
        other => Err(StoreError::Codec(format!(
            "fields must serialize to an object, got {}",
            other
        ))),
    }
}

fn decode<T: DeserializeOwned>(doc: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Open the backend selected by the configured URL.
///
/// # Errors
///
/// Returns `StoreError::Unavailable` when the URL is missing, names an
/// unsupported backend, or the server cannot be reached.
pub async fn connect(config: &StoreConfig) -> StoreResult<Arc<dyn DocumentStore>> {
    let url = config
        .url()
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

    let store: Arc<dyn DocumentStore> = match url {
        StoreUrl::Memory => Arc::new(MemoryStore::new()),
        #[cfg(feature = "mongodb")]
        StoreUrl::Mongo(url) => Arc::new(MongoStore::connect(&url, &config.database).await?),
        #[cfg(not(feature = "mongodb"))]
        StoreUrl::Mongo(_) => {
            return Err(StoreError::Unavailable(
                "mongodb URL given but the `mongodb` feature is not enabled".to_string(),
            ));
        }
    };

    info!(backend = store.backend(), "store connected");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize)]
    struct NoteFields {
        text: String,
    }

    #[derive(Debug, Deserialize)]
    struct Note {
        #[serde(rename = "_id")]
        id: String,
        text: String,
    }

    impl Entity for Note {
        type Fields = NoteFields;
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn notes() -> Collection<Note> {
        Collection::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_parse_object_id() {
        assert!(parse_object_id("0123456789abcdefabcdef01").is_ok());
        assert!(parse_object_id("0123456789abcdefABCDEF01").is_err());
        assert!(parse_object_id("0123456789abcdef0123456").is_err());
        assert!(parse_object_id("0123456789abcdef012345678").is_err());
        assert!(parse_object_id("0123456789abcdef0123456g").is_err());
        assert!(parse_object_id("").is_err());
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let notes = notes();
        let created = notes
            .create(&NoteFields { text: "hello".into() })
            .await
            .unwrap();

        let found = notes.get_by_id(created.id()).await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.text, "hello");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let notes = notes();
        let created = notes.create(&NoteFields { text: "a".into() }).await.unwrap();

        let updated = notes
            .update_by_id(created.id(), &NoteFields { text: "b".into() })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.text, "b");

        let removed = notes.delete_by_id(created.id()).await.unwrap().unwrap();
        assert_eq!(removed.text, "b");
        assert!(notes.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_record_is_none() {
        let notes = notes();
        let id = "0123456789abcdef01234567";
        assert!(notes.get_by_id(id).await.unwrap().is_none());
        assert!(notes
            .update_by_id(id, &NoteFields { text: "x".into() })
            .await
            .unwrap()
            .is_none());
        assert!(notes.delete_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_connect_memory_url() {
        let config = StoreConfig::new(Some("memory://".to_string()));
        let store = connect(&config).await.unwrap();
        assert_eq!(store.backend(), "memory");
    }

    #[tokio::test]
    async fn test_connect_without_url_fails() {
        let config = StoreConfig::new(None);
        let err = connect(&config).await.err().unwrap();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
