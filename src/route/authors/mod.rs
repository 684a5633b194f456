//! Author handlers. Every response carrying an author has its `books` references
//! expanded into book records, see [`crate::relation`].

pub mod app;
pub mod create_author;
pub mod delete_author;
pub mod get_author;
pub mod list_authors;
pub mod update_author;
