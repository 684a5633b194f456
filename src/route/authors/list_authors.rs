use axum::extract::State;

use crate::{
    error::{ApiError, ErrorVerbosityProvider},
    relation::expand_authors,
    route::Found,
    state::ApiState,
    store::{Collection, Record},
    traits::StoreProvider,
};

pub async fn list_authors(
    State(state): State<ApiState>,
) -> Result<Found<Vec<Record>>, ApiError> {
    let store = state.store();

    let authors = store
        .find_all(Collection::Authors)
        .await
        .map_err(|err| ApiError::from_store_read(state.error_verbosity(), err))?;

    let authors = expand_authors(store, authors)
        .await
        .map_err(|err| ApiError::from_store_read(state.error_verbosity(), err))?;

    Ok(Found(authors))
}
