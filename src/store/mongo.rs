use anyhow::Context;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    Client, Database,
};
use serde_json::{Number, Value};

use super::{
    parse_id,
    schema::{self, WriteMode},
    Collection, DocumentStore, Record, StoreError, ID_FIELD,
};

/// A [`DocumentStore`] backed by a MongoDB database.
///
/// Documents keep their id under `_id` and author references as object ids. Both are
/// converted to hex strings on the way out.
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Creates the client. No connection is made until the first operation.
    pub async fn new(uri: &str, database: &str) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .context("Invalid MongoDB connection string")?;

        Ok(Self {
            database: client.database(database),
        })
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.database.collection::<Document>(collection.name())
    }
}

fn unexpected(err: mongodb::error::Error) -> StoreError {
    StoreError::Unexpected(err.into())
}

fn to_document(collection: Collection, record: Record) -> Document {
    record
        .into_iter()
        .map(|(key, value)| {
            let value = match (collection, key.as_str(), value) {
                (Collection::Authors, "books", Value::Array(books)) => {
                    Bson::Array(books.into_iter().map(to_reference).collect())
                }
                (_, _, value) => to_bson(value),
            };

            (key, value)
        })
        .collect()
}

/// Author references were validated by the schema, anything else is kept as is.
fn to_reference(value: Value) -> Bson {
    match value {
        Value::String(id) => match ObjectId::parse_str(&id) {
            Ok(oid) => Bson::ObjectId(oid),
            Err(_) => Bson::String(id),
        },
        other => to_bson(other),
    }
}

fn to_bson(value: Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(number) => match number.as_i64() {
            Some(n) => match i32::try_from(n) {
                Ok(n) => Bson::Int32(n),
                Err(_) => Bson::Int64(n),
            },
            None => Bson::Double(number.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => Bson::String(s),
        Value::Array(items) => Bson::Array(items.into_iter().map(to_bson).collect()),
        Value::Object(map) => Bson::Document(
            map.into_iter()
                .map(|(key, value)| (key, to_bson(value)))
                .collect(),
        ),
    }
}

fn to_record(document: Document) -> Record {
    document
        .into_iter()
        .filter(|(key, _)| key != "__v")
        .map(|(key, value)| {
            let key = match key.as_str() {
                "_id" => ID_FIELD.to_string(),
                _ => key,
            };

            (key, to_json(value))
        })
        .collect()
}

fn to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Null => Value::Null,
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(n) => Value::Number(n.into()),
        Bson::Int64(n) => Value::Number(n.into()),
        Bson::Double(n) => Number::from_f64(n).map_or(Value::Null, Value::Number),
        Bson::String(s) => Value::String(s),
        Bson::Array(items) => Value::Array(items.into_iter().map(to_json).collect()),
        Bson::Document(document) => Value::Object(
            document
                .into_iter()
                .map(|(key, value)| (key, to_json(value)))
                .collect(),
        ),
        other => other.into_relaxed_extjson(),
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    #[tracing::instrument(skip(self, record))]
    async fn insert(&self, collection: Collection, record: Record) -> Result<Record, StoreError> {
        let record = schema::prepare(collection, record, WriteMode::Create)?;

        let document: Document =
            std::iter::once(("_id".to_string(), Bson::ObjectId(ObjectId::new())))
                .chain(to_document(collection, record))
                .collect();

        self.collection(collection)
            .insert_one(&document, None)
            .await
            .map_err(unexpected)?;

        Ok(to_record(document))
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self, collection: Collection) -> Result<Vec<Record>, StoreError> {
        let documents: Vec<Document> = self
            .collection(collection)
            .find(None, None)
            .await
            .map_err(unexpected)?
            .try_collect()
            .await
            .map_err(unexpected)?;

        Ok(documents.into_iter().map(to_record).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Record>, StoreError> {
        let oid = parse_id(id)?;

        let document = self
            .collection(collection)
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(unexpected)?;

        Ok(document.map(to_record))
    }

    #[tracing::instrument(skip(self, patch))]
    async fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        patch: Record,
    ) -> Result<Option<Record>, StoreError> {
        let oid = parse_id(id)?;
        let patch = schema::prepare(collection, patch, WriteMode::Update)?;

        // An empty `$set` is rejected by the server.
        if patch.is_empty() {
            return self.find_by_id(collection, id).await;
        }

        let update = doc! { "$set": to_document(collection, patch) };

        let before = self
            .collection(collection)
            .find_one_and_update(doc! { "_id": oid }, update, None)
            .await
            .map_err(unexpected)?;

        Ok(before.map(to_record))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Record>, StoreError> {
        let oid = parse_id(id)?;

        let removed = self
            .collection(collection)
            .find_one_and_delete(doc! { "_id": oid }, None)
            .await
            .map_err(unexpected)?;

        Ok(removed.map(to_record))
    }

    #[tracing::instrument(skip(self))]
    async fn ping(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(unexpected)?;

        Ok(())
    }
}
