//! Shape rules enforced by every [`DocumentStore`](super::DocumentStore) on writes.
//!
//! Fields not named here pass through unchanged.

use serde_json::Value;

use super::{parse_id, Collection, Record, StoreError, ID_FIELD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// Strips client supplied ids and checks `record` against the rules of `collection`.
pub fn prepare(
    collection: Collection,
    mut record: Record,
    mode: WriteMode,
) -> Result<Record, StoreError> {
    record.remove(ID_FIELD);
    record.remove("_id");

    let mut violations = Vec::new();

    match collection {
        Collection::Books => check_book(&record, mode, &mut violations),
        Collection::Authors => check_author(&mut record, mode, &mut violations),
    }

    if !violations.is_empty() {
        return Err(StoreError::Validation(format!(
            "{} validation failed: {}",
            collection.kind(),
            violations.join(", ")
        )));
    }

    Ok(record)
}

fn check_book(record: &Record, mode: WriteMode, violations: &mut Vec<String>) {
    match record.get("title") {
        Some(Value::String(title)) if mode == WriteMode::Create && title.is_empty() => {
            violations.push("title is required".to_string())
        }
        Some(Value::String(_)) => {}
        None if mode == WriteMode::Update => {}
        None | Some(Value::Null) => violations.push("title is required".to_string()),
        Some(other) => violations.push(format!("title must be a string, got {other}")),
    }
}

fn check_author(record: &mut Record, mode: WriteMode, violations: &mut Vec<String>) {
    match record.get("name") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(other) => violations.push(format!("name must be a string, got {other}")),
    }

    if mode == WriteMode::Create && !record.contains_key("books") {
        record.insert("books".to_string(), Value::Array(Vec::new()));
    }

    match record.get("books") {
        None => {}
        Some(Value::Array(books)) => {
            for book in books {
                match book {
                    Value::String(id) if parse_id(id).is_ok() => {}
                    other => violations.push(format!("books contains an invalid reference {other}")),
                }
            }
        }
        Some(other) => violations.push(format!("books must be an array, got {other}")),
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    use super::*;
    use crate::store::test_record as record;

    #[test]
    fn book_create_requires_title() {
        let result = prepare(
            Collection::Books,
            record(json!({"publishedYear": 1965})),
            WriteMode::Create,
        );

        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test]
    fn book_update_may_omit_title() {
        let result = prepare(
            Collection::Books,
            record(json!({"publishedYear": 1965})),
            WriteMode::Update,
        );

        assert!(result.is_ok());
    }

    #[test]
    fn book_fields_other_than_title_pass_through() {
        let fields = json!({"title": "Dune", "publishedYear": 1965.0, "genre": ["sf"]});

        let prepared = prepare(Collection::Books, record(fields.clone()), WriteMode::Create)
            .expect("valid book");

        assert_eq!(Value::Object(prepared), fields);

        let prepared = prepare(
            Collection::Books,
            record(json!({"publishedYear": "1965"})),
            WriteMode::Update,
        )
        .expect("valid patch");

        assert_eq!(prepared["publishedYear"], json!("1965"));
    }

    #[test]
    fn client_ids_are_dropped() {
        let prepared = prepare(
            Collection::Books,
            record(json!({"id": "abc", "_id": "def", "title": "Dune"})),
            WriteMode::Create,
        )
        .expect("valid book");

        assert_eq!(prepared, record(json!({"title": "Dune"})));
    }

    #[test]
    fn author_books_default_to_empty_on_create() {
        let prepared = prepare(
            Collection::Authors,
            record(json!({"name": "Herbert"})),
            WriteMode::Create,
        )
        .expect("valid author");

        assert_eq!(prepared.get("books"), Some(&json!([])));
    }

    #[test]
    fn author_books_must_be_ids() {
        let valid = ObjectId::new().to_hex();

        let result = prepare(
            Collection::Authors,
            record(json!({"name": "Herbert", "books": [valid, "not-an-id"]})),
            WriteMode::Update,
        );

        match result {
            Err(StoreError::Validation(reason)) => assert!(reason.contains("not-an-id")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
