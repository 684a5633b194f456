use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{
    parse_id,
    schema::{self, WriteMode},
    Collection, DocumentStore, Record, StoreError, ID_FIELD,
};

/// A [`DocumentStore`] kept in process memory.
///
/// Ids are generated the same way the MongoDB store generates them, so id parsing
/// behaves identically. Documents are kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    books: RwLock<Documents>,
    authors: RwLock<Documents>,
}

#[derive(Debug, Default)]
struct Documents {
    entries: Vec<(ObjectId, Record)>,
}

impl Documents {
    fn position(&self, id: &ObjectId) -> Option<usize> {
        self.entries.iter().position(|(entry_id, _)| entry_id == id)
    }

    fn get(&self, id: &ObjectId) -> Option<&Record> {
        self.position(id).map(|index| &self.entries[index].1)
    }

    fn get_mut(&mut self, id: &ObjectId) -> Option<&mut Record> {
        self.position(id).map(|index| &mut self.entries[index].1)
    }

    fn remove(&mut self, id: &ObjectId) -> Option<Record> {
        self.position(id).map(|index| self.entries.remove(index).1)
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn documents(&self, collection: Collection) -> &RwLock<Documents> {
        match collection {
            Collection::Books => &self.books,
            Collection::Authors => &self.authors,
        }
    }
}

fn with_id(id: &ObjectId, mut record: Record) -> Record {
    record.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
    record
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    #[tracing::instrument(skip(self, record))]
    async fn insert(&self, collection: Collection, record: Record) -> Result<Record, StoreError> {
        let record = schema::prepare(collection, record, WriteMode::Create)?;
        let id = ObjectId::new();
        let stored = with_id(&id, record);

        self.documents(collection)
            .write()
            .await
            .entries
            .push((id, stored.clone()));

        tracing::debug!(%id, "Inserted");

        Ok(stored)
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self, collection: Collection) -> Result<Vec<Record>, StoreError> {
        let documents = self.documents(collection).read().await;

        Ok(documents
            .entries
            .iter()
            .map(|(_, record)| record.clone())
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Record>, StoreError> {
        let id = parse_id(id)?;
        let documents = self.documents(collection).read().await;

        Ok(documents.get(&id).cloned())
    }

    #[tracing::instrument(skip(self, patch))]
    async fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        patch: Record,
    ) -> Result<Option<Record>, StoreError> {
        let id = parse_id(id)?;
        let patch = schema::prepare(collection, patch, WriteMode::Update)?;

        let mut documents = self.documents(collection).write().await;

        let Some(current) = documents.get_mut(&id) else {
            return Ok(None);
        };

        let before = current.clone();
        current.extend(patch);

        Ok(Some(before))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Record>, StoreError> {
        let id = parse_id(id)?;

        Ok(self.documents(collection).write().await.remove(&id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
