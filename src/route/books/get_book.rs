use axum::extract::State;

use crate::{
    error::{ApiError, ErrorVerbosityProvider, ResourceNotFoundError},
    extractor::path::ApiPath,
    route::Found,
    state::ApiState,
    store::{Collection, Record},
    traits::StoreProvider,
};

pub async fn get_book(
    State(state): State<ApiState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Found<Record>, ApiError> {
    let book = state
        .store()
        .find_by_id(Collection::Books, &id)
        .await
        .map_err(|err| ApiError::from_store_read(state.error_verbosity(), err))?
        .ok_or_else(|| ResourceNotFoundError::new(Collection::Books))?;

    Ok(Found(book))
}
