use axum::extract::State;

use crate::{
    error::{ApiError, ErrorVerbosityProvider},
    extractor::json::ApiJson,
    route::Created,
    state::ApiState,
    store::{Collection, Record},
    traits::StoreProvider,
};

pub async fn create_book(
    State(state): State<ApiState>,
    ApiJson(book): ApiJson<Record>,
) -> Result<Created<Record>, ApiError> {
    let book = state
        .store()
        .insert(Collection::Books, book)
        .await
        .map_err(|err| ApiError::from_store_write(state.error_verbosity(), err))?;

    tracing::info!(id = ?book.get("id"), "Book created");

    Ok(Created(book))
}
