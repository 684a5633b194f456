use axum::extract::State;

use crate::{
    error::{ApiError, ErrorVerbosityProvider, ResourceNotFoundError},
    extractor::path::ApiPath,
    relation::expand_author,
    route::Found,
    state::ApiState,
    store::{Collection, Record},
    traits::StoreProvider,
};

pub async fn get_author(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Found<Record>, ApiError> {
    let store = state.store();
    let verbosity = state.error_verbosity();

    let author = store
        .find_by_id(Collection::Authors, &id)
        .await
        .map_err(|err| ApiError::from_store_read(verbosity, err))?
        .ok_or_else(|| ResourceNotFoundError::new(Collection::Authors))?;

    let author = expand_author(store, author)
        .await
        .map_err(|err| ApiError::from_store_read(verbosity, err))?;

    Ok(Found(author))
}
