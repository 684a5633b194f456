//! Expansion of `Author.books` references into full book records.
//!
//! References are weak: a reference whose book is gone, or that is not an id at all,
//! is dropped from the expanded list.

use futures::future::try_join_all;
use serde_json::Value;

use crate::store::{Collection, DocumentStore, Record, StoreError};

const BOOKS_FIELD: &str = "books";

/// Replaces the `books` references of `author` with the referenced book records,
/// keeping the reference order.
#[tracing::instrument(skip_all)]
pub async fn expand_author(
    store: &dyn DocumentStore,
    mut author: Record,
) -> Result<Record, StoreError> {
    let references = match author.get(BOOKS_FIELD) {
        Some(Value::Array(references)) => references.clone(),
        _ => return Ok(author),
    };

    let books = try_join_all(
        references
            .iter()
            .map(|reference| resolve_book(store, reference)),
    )
    .await?;

    let books = books.into_iter().flatten().map(Value::Object).collect();
    author.insert(BOOKS_FIELD.to_string(), Value::Array(books));

    Ok(author)
}

pub async fn expand_authors(
    store: &dyn DocumentStore,
    authors: Vec<Record>,
) -> Result<Vec<Record>, StoreError> {
    try_join_all(
        authors
            .into_iter()
            .map(|author| expand_author(store, author)),
    )
    .await
}

async fn resolve_book(
    store: &dyn DocumentStore,
    reference: &Value,
) -> Result<Option<Record>, StoreError> {
    let Value::String(id) = reference else {
        tracing::debug!(%reference, "Skipping non-string book reference");

        return Ok(None);
    };

    match store.find_by_id(Collection::Books, id).await {
        Ok(None) => {
            tracing::debug!(%id, "Skipping dangling book reference");

            Ok(None)
        }
        Ok(book) => Ok(book),
        Err(StoreError::MalformedId(id)) => {
            tracing::debug!(%id, "Skipping malformed book reference");

            Ok(None)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::{in_memory::InMemoryStore, test_record as record, ID_FIELD};

    /// Serves authors from memory while every book lookup fails.
    struct BooksUnreachable(InMemoryStore);

    #[async_trait::async_trait]
    impl DocumentStore for BooksUnreachable {
        async fn insert(
            &self,
            collection: Collection,
            record: Record,
        ) -> Result<Record, StoreError> {
            self.0.insert(collection, record).await
        }

        async fn find_all(&self, collection: Collection) -> Result<Vec<Record>, StoreError> {
            self.0.find_all(collection).await
        }

        async fn find_by_id(
            &self,
            collection: Collection,
            id: &str,
        ) -> Result<Option<Record>, StoreError> {
            match collection {
                Collection::Books => Err(anyhow::anyhow!("connection reset").into()),
                Collection::Authors => self.0.find_by_id(collection, id).await,
            }
        }

        async fn update_by_id(
            &self,
            collection: Collection,
            id: &str,
            patch: Record,
        ) -> Result<Option<Record>, StoreError> {
            self.0.update_by_id(collection, id, patch).await
        }

        async fn delete_by_id(
            &self,
            collection: Collection,
            id: &str,
        ) -> Result<Option<Record>, StoreError> {
            self.0.delete_by_id(collection, id).await
        }

        async fn ping(&self) -> Result<(), StoreError> {
            self.0.ping().await
        }
    }

    async fn insert_book(store: &InMemoryStore, title: &str) -> Record {
        store
            .insert(Collection::Books, record(json!({ "title": title })))
            .await
            .expect("insert book")
    }

    #[tokio::test]
    async fn expansion_keeps_reference_order() {
        let store = InMemoryStore::new();
        let first = insert_book(&store, "Dune").await;
        let second = insert_book(&store, "Children of Dune").await;

        let author = record(json!({
            "name": "Herbert",
            "books": [second[ID_FIELD].clone(), first[ID_FIELD].clone()],
        }));

        let expanded = expand_author(&store, author).await.expect("expand");

        assert_eq!(
            expanded["books"],
            json!([Value::Object(second), Value::Object(first)])
        );
    }

    #[tokio::test]
    async fn dangling_references_are_skipped() {
        let store = InMemoryStore::new();
        let kept = insert_book(&store, "Dune").await;
        let deleted = insert_book(&store, "Gone").await;

        let deleted_id = deleted[ID_FIELD].as_str().expect("id").to_string();
        store
            .delete_by_id(Collection::Books, &deleted_id)
            .await
            .expect("delete");

        let author = record(json!({
            "name": "Herbert",
            "books": [deleted_id, kept[ID_FIELD].clone(), "garbage"],
        }));

        let expanded = expand_author(&store, author).await.expect("expand");

        assert_eq!(expanded["books"], json!([Value::Object(kept)]));
    }

    #[tokio::test]
    async fn authors_without_books_are_untouched() {
        let store = InMemoryStore::new();
        let author = record(json!({"name": "Anonymous"}));

        let expanded = expand_author(&store, author.clone()).await.expect("expand");

        assert_eq!(expanded, author);
    }

    #[tokio::test]
    async fn book_lookup_failures_abort_the_expansion() {
        let store = BooksUnreachable(InMemoryStore::new());
        let author = record(json!({
            "name": "Herbert",
            "books": [mongodb::bson::oid::ObjectId::new().to_hex()],
        }));

        let result = expand_author(&store, author).await;

        assert!(matches!(result, Err(StoreError::Unexpected(_))));
    }
}
