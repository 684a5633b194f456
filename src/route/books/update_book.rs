use axum::extract::State;

use crate::{
    error::{ApiError, ErrorVerbosityProvider, ResourceNotFoundError},
    extractor::{json::ApiJson, path::ApiPath},
    route::Found,
    state::ApiState,
    store::{Collection, Record},
    traits::StoreProvider,
};

/// Merges the body into the book and answers with the book as it was before.
pub async fn update_book(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(patch): ApiJson<Record>,
) -> Result<Found<Record>, ApiError> {
    let previous = state
        .store()
        .update_by_id(Collection::Books, &id, patch)
        .await
        .map_err(|err| ApiError::from_store_write(state.error_verbosity(), err))?
        .ok_or_else(|| ResourceNotFoundError::new(Collection::Books))?;

    tracing::info!(%id, "Book updated");

    Ok(Found(previous))
}
