use axum::{routing::get, Router};

use crate::state::ApiState;

pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .route(
            "/authors",
            get(super::list_authors::list_authors).post(super::create_author::create_author),
        )
        .route(
            "/authors/:id",
            get(super::get_author::get_author)
                .put(super::update_author::update_author)
                .delete(super::delete_author::delete_author),
        )
}
