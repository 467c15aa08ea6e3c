//! In-memory document store
//!
//! Process-local backend used with `memory://` URLs and in tests.
//! Collections keep insertion order; ids are 24-character hex strings
//! drawn from random UUID bytes, the same shape the document database
//! assigns.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::errors::StoreResult;
use super::{parse_object_id, Document, DocumentStore, ID_FIELD};

/// Thread-safe in-memory backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn generate_id() -> String {
    let bytes = Uuid::new_v4().into_bytes();
    bytes[..12].iter().map(|b| format!("{:02x}", b)).collect()
}

fn has_id(doc: &Document, id: &str) -> bool {
    doc.get(ID_FIELD).and_then(|v| v.as_str()) == Some(id)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, collection: &str, mut fields: Document) -> StoreResult<Document> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let mut id = generate_id();
        while docs.iter().any(|d| has_id(d, &id)) {
            id = generate_id();
        }

        fields.remove(ID_FIELD);
        let mut doc = Document::new();
        doc.insert(ID_FIELD.to_string(), id.into());
        doc.extend(fields);

        docs.push(doc.clone());
        Ok(doc)
    }

    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        parse_object_id(id)?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| has_id(d, id)))
            .cloned())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        mut fields: Document,
    ) -> StoreResult<Option<Document>> {
        parse_object_id(id)?;
        fields.remove(ID_FIELD);

        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| has_id(d, id)))
        else {
            return Ok(None);
        };

        doc.extend(fields);
        Ok(Some(doc.clone()))
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        parse_object_id(id)?;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };

        Ok(docs
            .iter()
            .position(|d| has_id(d, id))
            .map(|pos| docs.remove(pos)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_object_id() {
        let store = MemoryStore::new();
        let stored = store.insert("contatos", doc(json!({ "nome": "Ana" }))).await.unwrap();

        let id = stored[ID_FIELD].as_str().unwrap();
        assert_eq!(id.len(), 24);
        assert!(parse_object_id(id).is_ok());
        assert_eq!(stored["nome"], "Ana");
    }

    #[tokio::test]
    async fn test_caller_cannot_choose_id() {
        let store = MemoryStore::new();
        let forced = "aaaaaaaaaaaaaaaaaaaaaaaa";
        let stored = store
            .insert("contatos", doc(json!({ "_id": forced, "nome": "Ana" })))
            .await
            .unwrap();
        assert_ne!(stored[ID_FIELD], forced);
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let store = MemoryStore::new();
        for nome in ["A", "B", "C"] {
            store.insert("contatos", doc(json!({ "nome": nome }))).await.unwrap();
        }

        let all = store.find_all("contatos").await.unwrap();
        let names: Vec<_> = all.iter().map(|d| d["nome"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert!(store.find_all("usuarios").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = MemoryStore::new();
        let stored = store.insert("contatos", doc(json!({ "nome": "Ana" }))).await.unwrap();
        let id = stored[ID_FIELD].as_str().unwrap();

        assert!(store.find_by_id("usuarios", id).await.unwrap().is_none());
        assert!(store.find_by_id("contatos", id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_overwrites_given_fields_only() {
        let store = MemoryStore::new();
        let stored = store
            .insert("contatos", doc(json!({ "nome": "Ana", "telefone": "1" })))
            .await
            .unwrap();
        let id = stored[ID_FIELD].as_str().unwrap().to_string();

        let updated = store
            .update_by_id("contatos", &id, doc(json!({ "telefone": "2", "_id": "ffffffffffffffffffffffff" })))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated[ID_FIELD], id.as_str());
        assert_eq!(updated["nome"], "Ana");
        assert_eq!(updated["telefone"], "2");
    }

    #[tokio::test]
    async fn test_delete_returns_removed_document() {
        let store = MemoryStore::new();
        let stored = store.insert("contatos", doc(json!({ "nome": "Ana" }))).await.unwrap();
        let id = stored[ID_FIELD].as_str().unwrap().to_string();

        let removed = store.delete_by_id("contatos", &id).await.unwrap();
        assert_eq!(removed, Some(stored));
        assert!(store.delete_by_id("contatos", &id).await.unwrap().is_none());
        assert!(store.find_by_id("contatos", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_id_is_an_error() {
        let store = MemoryStore::new();
        let err = store.find_by_id("contatos", "123").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
        assert!(store.delete_by_id("contatos", "not-an-id").await.is_err());
        assert!(store
            .update_by_id("contatos", "zzzzzzzzzzzzzzzzzzzzzzzz", Document::new())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_uppercase_id_is_rejected() {
        let store = MemoryStore::new();
        let created = store
            .insert("contatos", doc(json!({ "nome": "Ana" })))
            .await
            .unwrap();
        let id = created[ID_FIELD].as_str().unwrap().to_uppercase();

        let err = store.find_by_id("contatos", &id).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
    }
}
