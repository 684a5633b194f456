use axum::extract::State;

use crate::{
    error::{ApiError, ErrorVerbosityProvider, ResourceNotFoundError},
    extractor::{json::ApiJson, path::ApiPath},
    relation::expand_author,
    route::Found,
    state::ApiState,
    store::{Collection, Record},
    traits::StoreProvider,
};

/// Merges the body into the author and answers with the author as it was before,
/// references expanded against the current books.
pub async fn update_author(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(patch): ApiJson<Record>,
) -> Result<Found<Record>, ApiError> {
    let store = state.store();
    let verbosity = state.error_verbosity();

    let previous = store
        .update_by_id(Collection::Authors, &id, patch)
        .await
        .map_err(|err| ApiError::from_store_write(verbosity, err))?
        .ok_or_else(|| ResourceNotFoundError::new(Collection::Authors))?;

    tracing::info!(%id, "Author updated");

    let previous = expand_author(store, previous)
        .await
        .map_err(|err| ApiError::from_store_read(verbosity, err))?;

    Ok(Found(previous))
}
