use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::state::ApiState;

pub mod authors;
pub mod books;

pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .route("/health", get(|| async { "OK" }))
        .merge(books::app::app())
        .merge(authors::app::app())
}

/// A freshly stored document, answered with [`StatusCode::CREATED`].
#[derive(Debug)]
pub struct Created<T>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

/// One or more documents, answered with [`StatusCode::OK`].
#[derive(Debug)]
pub struct Found<T>(pub T);

impl<T: Serialize> IntoResponse for Found<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.0)).into_response()
    }
}

/// An empty [`StatusCode::NO_CONTENT`] response.
#[derive(Debug)]
pub struct Deleted;

impl IntoResponse for Deleted {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}
