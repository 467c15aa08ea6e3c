//! MongoDB document store
//!
//! Backed by the official driver. Ids are `ObjectId`s on the wire and
//! 24-character hex strings everywhere else. Updates apply the given
//! fields with `$set` and return the document as it is after the write.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document as BsonDocument};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, Database};
use tracing::debug;

use super::errors::{StoreError, StoreResult};
use super::{parse_object_id, Document, DocumentStore, ID_FIELD};

/// Version key written by older clients of the same collections
const VERSION_KEY: &str = "__v";

/// MongoDB backend
#[derive(Debug, Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connects and pings the server.
    ///
    /// The database named in the URL wins over `default_database`.
    pub async fn connect(url: &str, default_database: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(url).await.map_err(map_error)?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(default_database));

        db.run_command(doc! { "ping": 1 }).await.map_err(map_error)?;
        debug!(database = %db.name(), "mongodb ping ok");

        Ok(Self { db })
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.db.collection(name)
    }
}

fn map_error(err: MongoError) -> StoreError {
    match *err.kind {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        _ => StoreError::Backend(err.to_string()),
    }
}

fn object_id(id: &str) -> StoreResult<ObjectId> {
    parse_object_id(id)?;
    ObjectId::parse_str(id).map_err(|e| StoreError::InvalidId(e.to_string()))
}

fn to_bson(mut fields: Document) -> StoreResult<BsonDocument> {
    fields.remove(ID_FIELD);
    bson::to_document(&fields).map_err(|e| StoreError::Codec(e.to_string()))
}

fn from_bson(mut doc: BsonDocument) -> StoreResult<Document> {
    let id = match doc.remove(ID_FIELD) {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(s)) => s,
        Some(other) => {
            return Err(StoreError::Codec(format!("unsupported _id type: {}", other)));
        }
        None => return Err(StoreError::Codec("document without _id".to_string())),
    };

    let mut out = Document::new();
    out.insert(ID_FIELD.to_string(), id.into());
    for (key, value) in doc {
        if key == VERSION_KEY {
            continue;
        }
        out.insert(key, value.into_relaxed_extjson());
    }
    Ok(out)
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn insert(&self, collection: &str, fields: Document) -> StoreResult<Document> {
        let mut doc = to_bson(fields)?;
        doc.insert(ID_FIELD, ObjectId::new());

        self.collection(collection)
            .insert_one(doc.clone())
            .await
            .map_err(map_error)?;

        from_bson(doc)
    }

    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let docs: Vec<BsonDocument> = self
            .collection(collection)
            .find(doc! {})
            .await
            .map_err(map_error)?
            .try_collect()
            .await
            .map_err(map_error)?;

        docs.into_iter().map(from_bson).collect()
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let oid = object_id(id)?;
        self.collection(collection)
            .find_one(doc! { "_id": oid })
            .await
            .map_err(map_error)?
            .map(from_bson)
            .transpose()
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> StoreResult<Option<Document>> {
        let oid = object_id(id)?;
        let set = to_bson(fields)?;
        if set.is_empty() {
            return self.find_by_id(collection, id).await;
        }

        self.collection(collection)
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_error)?
            .map(from_bson)
            .transpose()
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let oid = object_id(id)?;
        self.collection(collection)
            .find_one_and_delete(doc! { "_id": oid })
            .await
            .map_err(map_error)?
            .map(from_bson)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_bson_converts_object_id_and_drops_version() {
        let oid = ObjectId::new();
        let doc = doc! { "_id": oid, "nome": "Ana", "favorito": true, "__v": 0 };

        let out = from_bson(doc).unwrap();
        assert_eq!(out[ID_FIELD], json!(oid.to_hex()));
        assert_eq!(out["nome"], "Ana");
        assert_eq!(out["favorito"], true);
        assert!(!out.contains_key(VERSION_KEY));
    }

    #[test]
    fn test_to_bson_strips_id() {
        let fields = json!({ "_id": "x", "nome": "Ana" }).as_object().cloned().unwrap();
        let doc = to_bson(fields).unwrap();
        assert!(!doc.contains_key(ID_FIELD));
        assert_eq!(doc.get_str("nome").unwrap(), "Ana");
    }

    #[test]
    fn test_object_id_rejects_malformed() {
        assert!(matches!(object_id("abc"), Err(StoreError::InvalidId(_))));
        assert!(object_id("0123456789abcdef01234567").is_ok());
    }
}
