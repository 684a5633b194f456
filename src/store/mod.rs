use std::fmt::Display;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::{Map, Value};

pub mod in_memory;
pub mod mongo;
pub mod schema;

/// A stored document as seen by the handlers.
///
/// The identifier is always exposed under the `id` key as a hex string.
pub type Record = Map<String, Value>;

pub const ID_FIELD: &str = "id";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store refused the shape of a write.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// The identifier could not be interpreted by the store.
    #[error("Cast to ObjectId failed for value \"{0}\"")]
    MalformedId(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Books,
    Authors,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Books => "books",
            Collection::Authors => "authors",
        }
    }

    /// Singular, capitalized name used in client facing messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Collection::Books => "Book",
            Collection::Authors => "Author",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds a record from a JSON object literal.
#[cfg(test)]
pub(crate) fn test_record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("test records are objects"),
    }
}

/// Parses a client supplied identifier.
pub fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::MalformedId(id.to_string()))
}

/// Document database backing the service.
///
/// Every method is a single logical store operation. Lookups that match no document
/// return `Ok(None)`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Validates and persists `record`, assigning a fresh id. Returns the stored record.
    async fn insert(&self, collection: Collection, record: Record) -> Result<Record, StoreError>;

    /// Returns every record of `collection` in the store's natural order.
    async fn find_all(&self, collection: Collection) -> Result<Vec<Record>, StoreError>;

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Record>, StoreError>;

    /// Merges `patch` into the record with `id`. Returns the record as it was before the update.
    async fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        patch: Record,
    ) -> Result<Option<Record>, StoreError>;

    /// Removes the record with `id`. Returns the removed record.
    async fn delete_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Record>, StoreError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Which store the server talks to.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StoreConfig {
    Mongodb { uri: String, database: String },
    InMemory,
}
